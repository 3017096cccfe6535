//! MathGet Package Manager Library
//!
//! This crate provides package management functionality for MathScript,
//! including:
//! - Category-coded error values with stable numeric codes
//! - Local metadata storage and version-constraint resolution
//! - A remote index client (metadata, archives, versions, search)
//! - Install, update, and uninstall with recursive dependency handling
//! - Read-only query commands (info, dependencies, versions, ...)

pub mod commands;
pub mod error;
pub mod index;
pub mod layout;
pub mod metadata;
pub mod store;
pub mod version;

pub use commands::{install, list_packages, search, uninstall, update, Prompt, StdinPrompt};
pub use error::{kinds, Category, Error, Kind, Kinds, Registry, Result};
pub use index::{HttpIndex, Index, DEFAULT_INDEX};
pub use layout::Layout;
pub use metadata::{
    display_constraint, PackageFields, PackageMetadata, SearchEntry, SearchResults, VersionList,
};
pub use store::{MetadataStore, Scope, LATEST};
pub use version::{Version, VersionError};
