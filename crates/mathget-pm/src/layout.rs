//! Install-root discovery and on-disk layout
//!
//! Packages live under `<install root>/user_packages/`, one directory per
//! installed package, next to three bookkeeping directories: `cached/` for
//! in-flight archive downloads, `metadata_files/` for live metadata, and
//! `metadata_files/cached/` for the cached metadata mirror.
//!
//! The install root is an explicit value resolved once at startup rather
//! than a global discovered as a side effect: a `--install-root` flag wins,
//! then the `MATHSCRIPT_HOME` environment variable, then the directory
//! holding the `mathscript` executable on `PATH`.

use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the install root holding user packages.
pub const PACKAGES_DIR: &str = "user_packages";

/// Directory for in-flight archive downloads, and the name of the cached
/// metadata mirror under the metadata directory.
pub const CACHED_DIR: &str = "cached";

/// Directory holding live metadata files.
pub const METADATA_DIR: &str = "metadata_files";

/// Entry-point file marking a package directory as installed.
pub const INIT_FILE: &str = "init.mscr";

const HOME_ENV: &str = "MATHSCRIPT_HOME";
const RUNTIME_EXECUTABLE: &str = "mathscript";

/// The packages root and its bookkeeping directories.
#[derive(Debug, Clone)]
pub struct Layout {
    packages_root: PathBuf,
}

impl Layout {
    /// Opens the layout under the given MathScript install directory,
    /// creating the packages root and bookkeeping directories as needed.
    pub fn open(install_root: &Path) -> Result<Self> {
        let packages_root = install_root.join(PACKAGES_DIR);
        let layout = Self { packages_root };

        for dir in [
            layout.packages_root.clone(),
            layout.archive_cache_dir(),
            layout.metadata_dir(),
            layout.cached_metadata_dir(),
        ] {
            fs::create_dir_all(&dir)
                .map_err(|e| Error::io(format!("failed to create \"{}\"", dir.display()), &e))?;
        }

        Ok(layout)
    }

    /// Resolves the install root: explicit value, then `MATHSCRIPT_HOME`,
    /// then the directory of the `mathscript` executable on `PATH`.
    pub fn resolve_install_root(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(home) = env::var_os(HOME_ENV) {
            return Ok(PathBuf::from(home));
        }
        find_runtime_on_path().ok_or_else(Error::installation_not_found)
    }

    pub fn packages_root(&self) -> &Path {
        &self.packages_root
    }

    /// Directory a package's files are unpacked into.
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.packages_root.join(package)
    }

    /// Directory archives are downloaded into before extraction.
    pub fn archive_cache_dir(&self) -> PathBuf {
        self.packages_root.join(CACHED_DIR)
    }

    /// Cache path for a version's archive: `cached/{name}-{version}.zip`.
    pub fn archive_path(&self, package: &str, version: &str) -> PathBuf {
        self.archive_cache_dir()
            .join(format!("{package}-{version}.zip"))
    }

    /// Live metadata directory.
    pub fn metadata_dir(&self) -> PathBuf {
        self.packages_root.join(METADATA_DIR)
    }

    /// Cached metadata mirror.
    pub fn cached_metadata_dir(&self) -> PathBuf {
        self.metadata_dir().join(CACHED_DIR)
    }

    /// Names of installed packages, sorted. A directory counts as a
    /// package only if it holds a regular `init.mscr` file; the
    /// bookkeeping directories are excluded.
    pub fn installed_packages(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.packages_root).map_err(|e| {
            Error::io(
                format!("failed to list \"{}\"", self.packages_root.display()),
                &e,
            )
        })?;

        let mut packages = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                Error::io(
                    format!("failed to list \"{}\"", self.packages_root.display()),
                    &e,
                )
            })?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if !path.is_dir() || name == METADATA_DIR || name == CACHED_DIR {
                continue;
            }
            let init = path.join(INIT_FILE);
            if init.is_file() {
                packages.push(name);
            }
        }

        packages.sort();
        Ok(packages)
    }
}

/// Searches `PATH` for the MathScript runtime and returns its directory.
fn find_runtime_on_path() -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    for dir in env::split_paths(&path) {
        if dir.join(RUNTIME_EXECUTABLE).is_file() {
            return Some(dir);
        }
        #[cfg(windows)]
        {
            if dir.join(format!("{RUNTIME_EXECUTABLE}.exe")).is_file() {
                return Some(dir);
            }
        }
    }
    None
}
