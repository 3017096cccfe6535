//! Remote package index access
//!
//! The index hosts package metadata, version listings, archives, and
//! search. The lifecycle engine and query commands consume it through the
//! [`Index`] trait; [`HttpIndex`] is the production implementation.

mod http;

pub use http::HttpIndex;

use crate::error::Result;
use crate::metadata::{PackageMetadata, SearchEntry};
use std::path::Path;

/// Default package index URL.
pub const DEFAULT_INDEX: &str = "http://mathget-index.byethost12.com";

/// Operations a package index provides.
pub trait Index {
    /// Fetches a package's metadata document, resolved server-side against
    /// the given version constraint.
    fn fetch_metadata(&self, package: &str, constraint: &str) -> Result<PackageMetadata>;

    /// Downloads the archive of an exact package version to `dest`.
    fn download_archive(&self, package: &str, version: &str, dest: &Path) -> Result<()>;

    /// Lists the published versions of a package.
    fn fetch_versions(&self, package: &str) -> Result<Vec<String>>;

    /// Searches the index for packages matching a keyword.
    fn search(&self, keyword: &str) -> Result<Vec<SearchEntry>>;
}
