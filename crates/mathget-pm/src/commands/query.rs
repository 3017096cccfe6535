//! Read-only query commands
//!
//! Thin reporters over the remote index: info, dependencies, versions,
//! changelog, license, doc, source, issues. Absent optional fields render
//! as "Not specified" / "(None)" placeholders instead of erroring.

use crate::error::Result;
use crate::index::Index;
use crate::metadata::{display_constraint, PackageMetadata};
use crate::store::LATEST;

const NOT_SPECIFIED: &str = "Not specified";

/// Prints detailed information about a package.
pub fn info(index: &dyn Index, package: &str) -> Result<()> {
    let metadata = index.fetch_metadata(package, LATEST)?;
    let fields = &metadata.package;

    println!("Package: {}", fields.name);
    println!("Version: {}", fields.version);
    println!(
        "Description: {}",
        fields.description.as_deref().unwrap_or(NOT_SPECIFIED)
    );
    println!(
        "Author: {}",
        fields.author.as_deref().unwrap_or(NOT_SPECIFIED)
    );
    println!(
        "License: {}",
        fields.license.as_deref().unwrap_or(NOT_SPECIFIED)
    );
    println!(
        "Homepage: {}",
        fields.homepage.as_deref().unwrap_or(NOT_SPECIFIED)
    );

    if fields.keywords.is_empty() {
        println!("Keywords: (None)");
    } else {
        println!("Keywords:");
        for keyword in &fields.keywords {
            println!("- {keyword}");
        }
    }

    if metadata.dependencies.is_empty() {
        println!("Dependencies: (None)");
    } else {
        println!("Dependencies:");
        print_dependency_list(&metadata);
    }

    Ok(())
}

/// Prints the dependencies of a package.
pub fn dependencies(index: &dyn Index, package: &str) -> Result<()> {
    let metadata = index.fetch_metadata(package, LATEST)?;

    if metadata.dependencies.is_empty() {
        println!(
            "Dependencies for {}: (None)",
            metadata.package.name
        );
    } else {
        println!("Dependencies:");
        print_dependency_list(&metadata);
    }

    Ok(())
}

/// Prints the published versions of a package.
pub fn versions(index: &dyn Index, package: &str) -> Result<()> {
    let versions = index.fetch_versions(package)?;

    if versions.is_empty() {
        println!("No versions found for package \"{package}\".");
    } else {
        println!("Versions for package \"{package}\":");
        for version in versions {
            println!("- {version}");
        }
    }

    Ok(())
}

/// Prints the changelog of a package.
pub fn changelog(index: &dyn Index, package: &str) -> Result<()> {
    let metadata = index.fetch_metadata(package, LATEST)?;
    let changelog = &metadata.package.changelog;

    if changelog.is_empty() {
        println!("No changelog found for package \"{package}\".");
    } else {
        println!("Changelog for package \"{package}\":");
        for change in changelog {
            println!("- {change}");
        }
    }

    Ok(())
}

/// Prints the license of a package.
pub fn license(index: &dyn Index, package: &str) -> Result<()> {
    let metadata = index.fetch_metadata(package, LATEST)?;
    let fields = &metadata.package;

    match &fields.license {
        Some(license) => println!("License for package \"{}\": {license}", fields.name),
        None => println!("License for package \"{}\": Not specified.", fields.name),
    }

    Ok(())
}

/// Prints the documentation link of a package.
pub fn doc(index: &dyn Index, package: &str) -> Result<()> {
    let metadata = index.fetch_metadata(package, LATEST)?;
    let fields = &metadata.package;

    match &fields.homepage {
        Some(homepage) => println!("Documentation for package \"{}\": {homepage}", fields.name),
        None => println!("No documentation found for package \"{}\".", fields.name),
    }

    Ok(())
}

/// Prints the source link of a package.
pub fn source(index: &dyn Index, package: &str) -> Result<()> {
    let metadata = index.fetch_metadata(package, LATEST)?;
    let fields = &metadata.package;

    match &fields.homepage {
        Some(homepage) => println!("Source for package \"{}\": {homepage}", fields.name),
        None => println!("No source found for package \"{}\".", fields.name),
    }

    Ok(())
}

/// Prints the issue-tracker link of a package.
pub fn issues(index: &dyn Index, package: &str) -> Result<()> {
    let metadata = index.fetch_metadata(package, LATEST)?;
    let fields = &metadata.package;

    match &fields.homepage {
        Some(homepage) => println!("Issues for package \"{}\": {homepage}/issues", fields.name),
        None => println!("No issues found for package \"{}\".", fields.name),
    }

    Ok(())
}

fn print_dependency_list(metadata: &PackageMetadata) {
    for (name, raw) in &metadata.dependencies {
        let (op, version) = display_constraint(raw);
        println!("- {name}{op}={version}");
    }
}
