//! List command

use crate::error::Result;
use crate::layout::Layout;
use crate::store::{MetadataStore, LATEST};

/// Prints installed packages as `name==version` lines.
pub fn list_packages(layout: &Layout) -> Result<()> {
    println!("Installed packages:\n");

    let packages = layout.installed_packages()?;
    if packages.is_empty() {
        println!("(None)");
        return Ok(());
    }

    let store = MetadataStore::new(layout);
    for name in packages {
        let metadata = store.load(&name, LATEST)?;
        println!("{name}=={}", metadata.package.version);
    }

    Ok(())
}
