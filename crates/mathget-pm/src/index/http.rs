//! Blocking HTTP client for the package index

use super::{Index, DEFAULT_INDEX};
use crate::error::{Error, Result};
use crate::metadata::{PackageMetadata, SearchEntry, SearchResults, VersionList};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// HTTP client for a package index.
#[derive(Debug)]
pub struct HttpIndex {
    client: Client,
    base_url: String,
}

impl HttpIndex {
    /// Client for the default index.
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_INDEX)
    }

    /// Client for a custom index URL.
    pub fn with_url(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::network(format!("Invalid package index URL \"{base_url}\": {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("mathget/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::network(format!("Failed to build the HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str, package: &str) -> Result<Response> {
        let response = self.client.get(url).send().map_err(transport_error)?;
        check_status(&response, package)?;
        Ok(response)
    }

    fn get_document(&self, url: &str, package: &str) -> Result<String> {
        self.get(url, package)?.text().map_err(transport_error)
    }
}

impl Index for HttpIndex {
    fn fetch_metadata(&self, package: &str, constraint: &str) -> Result<PackageMetadata> {
        let url = format!(
            "{}/packages/metadata.php/{package}?version={constraint}",
            self.base_url
        );
        let text = self.get_document(&url, package)?;
        PackageMetadata::from_toml_str(&text).map_err(|e| {
            Error::internal(format!("malformed metadata document for \"{package}\": {e}"))
        })
    }

    fn download_archive(&self, package: &str, version: &str, dest: &Path) -> Result<()> {
        let url = format!(
            "{}/packages/install.php/{package}?version={version}",
            self.base_url
        );
        let mut response = self.get(&url, package)?;

        let mut file = File::create(dest)
            .map_err(|e| Error::io(format!("failed to create \"{}\"", dest.display()), &e))?;
        response.copy_to(&mut file).map_err(transport_error)?;
        Ok(())
    }

    fn fetch_versions(&self, package: &str) -> Result<Vec<String>> {
        let url = format!("{}/packages/versions.php/{package}", self.base_url);
        let text = self.get_document(&url, package)?;
        let list: VersionList = toml::from_str(&text).map_err(|e| {
            Error::internal(format!("malformed versions document for \"{package}\": {e}"))
        })?;
        Ok(list.versions)
    }

    fn search(&self, keyword: &str) -> Result<Vec<SearchEntry>> {
        let url = format!("{}/search.php/{keyword}", self.base_url);
        let text = self.get_document(&url, keyword)?;
        let results: SearchResults = toml::from_str(&text).map_err(|e| {
            Error::internal(format!("malformed search results for \"{keyword}\": {e}"))
        })?;
        Ok(results.packages)
    }
}

/// 404 means the package is unknown to the index; any other non-success
/// status surfaces as an HTTP error with its code.
fn check_status(response: &Response, package: &str) -> Result<()> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(Error::package_not_found(package, Some("remote")));
    }
    if !status.is_success() {
        return Err(Error::http(status.as_u16()));
    }
    Ok(())
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_connect() {
        Error::network("Unable to connect to the package index.")
    } else if e.is_timeout() {
        Error::network("Request timed out.")
    } else {
        Error::network(format!(
            "An error occurred while contacting the package index: {e}"
        ))
    }
}
