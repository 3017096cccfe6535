//! Local metadata store and version-constraint resolution
//!
//! One metadata file per (package, version) pair, named
//! `{name}-{version}.metadata`, kept flat in the live metadata directory
//! with a mirrored copy under `cached/`. The store owns this layout and
//! the constraint-resolution rules; nothing else interprets constraint
//! syntax.
//!
//! Resolution operates over the versions present on disk, not over the
//! remote index's list, so a stale local install can resolve "latest" to a
//! version behind the index.

use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::metadata::PackageMetadata;
use crate::version::Version;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of metadata files.
pub const METADATA_EXTENSION: &str = ".metadata";

/// Constraint token resolving to the newest known version.
pub const LATEST: &str = "latest";

/// Which metadata directory an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Metadata of currently-installed packages
    Live,
    /// Mirror retained for previously downloaded versions
    Cached,
}

/// Reads and writes local metadata files and resolves version constraints
/// against the versions present on disk.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    live: PathBuf,
    cached: PathBuf,
}

impl MetadataStore {
    pub fn new(layout: &Layout) -> Self {
        Self {
            live: layout.metadata_dir(),
            cached: layout.cached_metadata_dir(),
        }
    }

    fn dir(&self, scope: Scope) -> &Path {
        match scope {
            Scope::Live => &self.live,
            Scope::Cached => &self.cached,
        }
    }

    /// Path of a specific version's metadata file in a scope.
    pub fn metadata_path(&self, package: &str, version: &str, scope: Scope) -> PathBuf {
        self.dir(scope)
            .join(format!("{package}-{version}{METADATA_EXTENSION}"))
    }

    /// Resolves a version constraint against the versions known in the
    /// given scope and returns the path of the matching metadata file.
    ///
    /// Fails with a metadata-not-found error when no file belongs to the
    /// package or when the resolved version is not among the known ones
    /// (an exact version that was never downloaded, a `^`/`_` bound
    /// outside the known range, a `~` prefix with no match). A version
    /// token that does not parse aborts the lookup with an internal error.
    pub fn resolve_version_file(
        &self,
        package: &str,
        constraint: &str,
        scope: Scope,
    ) -> Result<PathBuf> {
        let dir = self.dir(scope);
        let entries = fs::read_dir(dir)
            .map_err(|e| Error::io(format!("failed to list \"{}\"", dir.display()), &e))?;

        let mut tokens = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| Error::io(format!("failed to list \"{}\"", dir.display()), &e))?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if let Some(token) = version_token(&file_name, package) {
                tokens.push(token.to_string());
            }
        }

        if tokens.is_empty() {
            return Err(Error::package_metadata_not_found(package));
        }

        let mut versions = Vec::with_capacity(tokens.len());
        for token in &tokens {
            let version = Version::parse(token).map_err(|e| {
                Error::internal(format!(
                    "unparsable version in metadata file for \"{package}\": {e}"
                ))
            })?;
            versions.push(version);
        }
        versions.sort();

        let resolved = resolve_constraint(package, constraint, &versions)?;

        if !versions.iter().any(|v| v.as_str() == resolved) {
            return Err(Error::package_metadata_not_found(package));
        }

        Ok(self.metadata_path(package, &resolved, scope))
    }

    /// Loads live metadata for a package, resolved against a constraint.
    pub fn load(&self, package: &str, constraint: &str) -> Result<PackageMetadata> {
        self.load_scope(package, constraint, Scope::Live)
    }

    /// Loads metadata from the cached mirror.
    pub fn load_cached(&self, package: &str, constraint: &str) -> Result<PackageMetadata> {
        self.load_scope(package, constraint, Scope::Cached)
    }

    fn load_scope(
        &self,
        package: &str,
        constraint: &str,
        scope: Scope,
    ) -> Result<PackageMetadata> {
        let path = self.resolve_version_file(package, constraint, scope)?;

        // The file was just listed, but resolution and reading are two
        // separate steps; report a vanished file per scope.
        if !path.exists() {
            return Err(match scope {
                Scope::Live => Error::package_metadata_not_found(package),
                Scope::Cached => Error::package_not_found(package, Some("cached")),
            });
        }

        let text = fs::read_to_string(&path)
            .map_err(|e| Error::io(format!("failed to read \"{}\"", path.display()), &e))?;
        PackageMetadata::from_toml_str(&text).map_err(|e| {
            Error::internal(format!(
                "malformed metadata file \"{}\": {e}",
                path.display()
            ))
        })
    }

    /// Persists a metadata document to both the live and cached scopes.
    pub fn save(&self, metadata: &PackageMetadata) -> Result<()> {
        let text = metadata.to_toml_string().map_err(|e| {
            Error::internal(format!(
                "failed to serialize metadata for \"{}\": {e}",
                metadata.package.name
            ))
        })?;

        for scope in [Scope::Live, Scope::Cached] {
            let path = self.metadata_path(&metadata.package.name, &metadata.package.version, scope);
            fs::write(&path, &text)
                .map_err(|e| Error::io(format!("failed to write \"{}\"", path.display()), &e))?;
        }
        Ok(())
    }

    /// Removes a version's metadata from both scopes. Missing files are
    /// tolerated.
    pub fn remove(&self, package: &str, version: &str) -> Result<()> {
        for scope in [Scope::Live, Scope::Cached] {
            let path = self.metadata_path(package, version, scope);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    Error::io(format!("failed to delete \"{}\"", path.display()), &e)
                })?;
            }
        }
        Ok(())
    }
}

/// Extracts the version token from `{name}-{version}.metadata`, or `None`
/// when the file does not belong to `package`.
fn version_token<'a>(file_name: &'a str, package: &str) -> Option<&'a str> {
    let stem = file_name.strip_suffix(METADATA_EXTENSION)?;
    let (name, version) = stem.rsplit_once('-')?;
    (name == package).then_some(version)
}

/// Picks a version string from the ascending-sorted known versions.
///
/// `latest` takes the newest; `^v` takes the newer of `v` and the newest
/// (newest dominates); `_v` takes the older of `v` and the oldest; `~v`
/// takes the newest whose raw string starts with `v`; a bare value is an
/// exact match. The caller verifies membership of the result, which is
/// what rejects out-of-range `^`/`_` bounds and unknown exact versions.
fn resolve_constraint(package: &str, constraint: &str, versions: &[Version]) -> Result<String> {
    let (oldest, newest) = match (versions.first(), versions.last()) {
        (Some(oldest), Some(newest)) => (oldest, newest),
        _ => return Err(Error::package_metadata_not_found(package)),
    };

    if constraint == LATEST {
        return Ok(newest.as_str().to_string());
    }

    if let Some(rest) = constraint.strip_prefix('^') {
        let requested = parse_requested(package, rest)?;
        let pick = if requested > *newest { &requested } else { newest };
        return Ok(pick.as_str().to_string());
    }

    if let Some(rest) = constraint.strip_prefix('_') {
        let requested = parse_requested(package, rest)?;
        let pick = if requested < *oldest { &requested } else { oldest };
        return Ok(pick.as_str().to_string());
    }

    if let Some(rest) = constraint.strip_prefix('~') {
        return versions
            .iter()
            .rev()
            .find(|v| v.as_str().starts_with(rest) || v.as_str() == rest)
            .map(|v| v.as_str().to_string())
            .ok_or_else(|| Error::package_metadata_not_found(package));
    }

    Ok(constraint.to_string())
}

fn parse_requested(package: &str, token: &str) -> Result<Version> {
    Version::parse(token).map_err(|e| {
        Error::internal(format!(
            "unparsable version constraint for \"{package}\": {e}"
        ))
    })
}
