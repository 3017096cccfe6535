//! Update command
//!
//! Like install, but presupposes an existing install: missing local
//! metadata is an error rather than a first-install.

use super::{run_target, unpack_archive, RUNTIME_PACKAGE};
use crate::error::{Error, Result};
use crate::index::Index;
use crate::layout::Layout;
use crate::store::{MetadataStore, LATEST};
use std::fs;
use std::path::Path;

/// Updates a package, or every package named in a requirements file.
pub fn update(
    layout: &Layout,
    index: &dyn Index,
    package: Option<&str>,
    requirements: Option<&Path>,
    force: bool,
) -> Result<()> {
    run_target(package, requirements, |name| {
        update_package(layout, index, name, force)
    })
}

fn update_package(layout: &Layout, index: &dyn Index, package: &str, force: bool) -> Result<()> {
    let metadata = index.fetch_metadata(package, LATEST)?;
    let version = metadata.package.version.clone();
    let store = MetadataStore::new(layout);

    // An update requires a prior install; load failures propagate.
    let local = store.load(package, LATEST)?;

    if local.package.version == version && !force {
        println!("Package \"{package}\" is already up to date.");
        println!("Version {version} is already installed.");
        return Ok(());
    }

    println!("Updating package \"{package}\" to version {version}.");

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

    store.save(&metadata)?;

    // Same recursion rules as install: newest published version, forced,
    // with the host runtime pseudo-dependency skipped.
    for dependency in metadata.dependencies.keys() {
        if dependency == RUNTIME_PACKAGE {
            continue;
        }
        update_package(layout, index, dependency, true)?;
    }

    println!("Package \"{package}\" updated to version {version}.");

    Ok(())
}
