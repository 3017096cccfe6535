//! Uninstall command

use super::run_target;
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::store::{MetadataStore, LATEST};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Confirmation seam for destructive operations.
pub trait Prompt {
    /// Asks whether the named package should be uninstalled.
    fn confirm(&mut self, package: &str) -> bool;
}

/// Interactive confirmation on stdin; only "y"/"Y" affirms.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, package: &str) -> bool {
        print!("Are you sure you want to uninstall package \"{package}\"? (y/N) ");
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        answer.trim().eq_ignore_ascii_case("y")
    }
}

/// Uninstalls a package, or every package named in a requirements file.
///
/// Unless forced, each package asks for confirmation; a declined
/// confirmation aborts that uninstall successfully.
pub fn uninstall(
    layout: &Layout,
    package: Option<&str>,
    requirements: Option<&Path>,
    force: bool,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    run_target(package, requirements, |name| {
        uninstall_package(layout, name, force, prompt)
    })
}

fn uninstall_package(
    layout: &Layout,
    package: &str,
    force: bool,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let package_dir = layout.package_dir(package);
    if !package_dir.exists() {
        return Err(Error::package_not_found(package, None));
    }

    let store = MetadataStore::new(layout);
    let metadata = store.load(package, LATEST)?;
    let version = metadata.package.version;

    if !force && !prompt.confirm(package) {
        println!("Aborting uninstallation.");
        return Ok(());
    }

    println!("Uninstalling package \"{package}\" version {version}.");

    // Regular files first, then the directory tree.
    let entries = fs::read_dir(&package_dir).map_err(|e| {
        Error::io(format!("failed to list \"{}\"", package_dir.display()), &e)
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::io(format!("failed to list \"{}\"", package_dir.display()), &e)
        })?;
        let path = entry.path();
        if path.is_file() {
            fs::remove_file(&path)
                .map_err(|e| Error::io(format!("failed to delete \"{}\"", path.display()), &e))?;
        }
    }

    println!("Deleting directories...");
    fs::remove_dir_all(&package_dir).map_err(|e| {
        Error::io(
            format!("failed to remove \"{}\"", package_dir.display()),
            &e,
        )
    })?;

    // Both metadata copies go; missing files at this point are tolerated.
    store.remove(package, &version)?;

    println!("Package \"{package}\" uninstalled.");

    Ok(())
}
