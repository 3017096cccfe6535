//! Install command
//!
//! Installs a package and, recursively, its declared dependencies.

use super::{run_target, unpack_archive, RUNTIME_PACKAGE};
use crate::error::{kinds, Error, Result};
use crate::index::Index;
use crate::layout::Layout;
use crate::store::{MetadataStore, LATEST};
use std::fs;
use std::path::Path;

/// Installs a package, or every package named in a requirements file.
pub fn install(
    layout: &Layout,
    index: &dyn Index,
    package: Option<&str>,
    requirements: Option<&Path>,
    force: bool,
) -> Result<()> {
    run_target(package, requirements, |name| {
        install_package(layout, index, name, force)
    })
}

fn install_package(layout: &Layout, index: &dyn Index, package: &str, force: bool) -> Result<()> {
    let metadata = index.fetch_metadata(package, LATEST)?;
    let version = metadata.package.version.clone();
    let store = MetadataStore::new(layout);

    if !force {
        match store.load(package, LATEST) {
            Ok(local) if local.package.version == version => {
                println!("Package \"{package}\" is already installed.");
                println!("Version {version} is already installed.");
                println!("Use `mathget update` to update the package.");
                return Ok(());
            }
            Ok(_) => {}
            // No prior install is the normal first-install case; anything
            // else from the local load is a real failure.
            Err(err)
                if err.is(&kinds().package_metadata_not_found)
                    || err.is(&kinds().package_not_found) => {}
            Err(err) => return Err(err),
        }
    }

    // Hard reset: a reinstall never merges into leftover files.
    let package_dir = layout.package_dir(package);
    if package_dir.exists() {
        fs::remove_dir_all(&package_dir).map_err(|e| {
            Error::io(
                format!("failed to remove \"{}\"", package_dir.display()),
                &e,
            )
        })?;
    }
    fs::create_dir_all(&package_dir).map_err(|e| {
        Error::io(
            format!("failed to create \"{}\"", package_dir.display()),
            &e,
        )
    })?;

    let archive_path = layout.archive_path(package, &version);
    index.download_archive(package, &version, &archive_path)?;

    println!("Unzipping {package}-{version}.");
    unpack_archive(&archive_path, &package_dir)?;
    fs::remove_file(&archive_path).map_err(|e| {
        Error::io(
            format!("failed to delete \"{}\"", archive_path.display()),
            &e,
        )
    })?;

    println!("Package \"{package}\" installed.");
    println!("Version {version} installed.");

    store.save(&metadata)?;

    // Dependencies are always installed at their newest published version;
    // the declared constraint string is used for display only, and the
    // recursive install is always forced.
    for dependency in metadata.dependencies.keys() {
        if dependency == RUNTIME_PACKAGE {
            continue;
        }
        install_package(layout, index, dependency, true)?;
    }

    Ok(())
}
