//! Search command

use crate::error::Result;
use crate::index::Index;

/// Searches the index and prints matching packages.
pub fn search(index: &dyn Index, keyword: &str) -> Result<()> {
    let packages = index.search(keyword)?;

    println!(
        "Found {} packages matching the keyword \"{keyword}\":",
        packages.len()
    );

    if packages.is_empty() {
        println!("(None)");
        return Ok(());
    }

    for entry in packages {
        println!(
            "- {}=={} (License: {})",
            entry.name,
            entry.version,
            entry.license.as_deref().unwrap_or("Not specified")
        );
    }

    Ok(())
}
