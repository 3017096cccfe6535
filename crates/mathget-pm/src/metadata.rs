//! Package metadata model (TOML wire and file format)
//!
//! The index serves metadata as TOML documents with a `[package]` table and
//! an optional `[dependencies]` table mapping dependency names to raw
//! version-constraint strings. The same format is persisted locally as
//! `{name}-{version}.metadata` files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A package metadata document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageMetadata {
    /// Package fields
    pub package: PackageFields,

    /// Dependencies: name -> raw constraint string (e.g. "^1.0.0")
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
}

/// The `[package]` table. `name` and `version` are always present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageFields {
    /// Package name
    pub name: String,

    /// Dot-separated numeric version string
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// Keywords, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Changelog entries, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changelog: Vec<String>,
}

impl PackageMetadata {
    /// Parse a metadata document from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Serialize the document back to TOML text.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

/// One entry in a search result listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchEntry {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

/// Payload of the search endpoint: a top-level `packages` array.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub packages: Vec<SearchEntry>,
}

/// Payload of the versions endpoint: a top-level `versions` array.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionList {
    #[serde(default)]
    pub versions: Vec<String>,
}

/// Reconstructs a human-readable operator from a raw constraint string's
/// prefix, for display only: `^` reads as ">", `_` as "<", `~` as "~", and
/// a bare value as "=". Resolution semantics live in the metadata store,
/// which this must not be confused with.
pub fn display_constraint(raw: &str) -> (char, &str) {
    match raw.as_bytes().first() {
        Some(b'^') => ('>', &raw[1..]),
        Some(b'_') => ('<', &raw[1..]),
        Some(b'~') => ('~', &raw[1..]),
        _ => ('=', raw),
    }
}
