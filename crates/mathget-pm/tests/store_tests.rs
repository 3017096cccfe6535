//! Integration tests for the local metadata store
//!
//! Exercises constraint resolution against real metadata directories.

use mathget_pm::{kinds, Layout, MetadataStore, PackageMetadata, Scope};
use std::fs;

fn layout() -> (tempfile::TempDir, Layout) {
    let root = tempfile::tempdir().unwrap();
    let layout = Layout::open(root.path()).unwrap();
    (root, layout)
}

fn write_metadata(layout: &Layout, scope: Scope, name: &str, version: &str) {
    let dir = match scope {
        Scope::Live => layout.metadata_dir(),
        Scope::Cached => layout.cached_metadata_dir(),
    };
    let text = format!("[package]\nname = \"{name}\"\nversion = \"{version}\"\n");
    fs::write(dir.join(format!("{name}-{version}.metadata")), text).unwrap();
}

#[test]
fn test_latest_resolves_numeric_maximum() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "demo", "1.9.0");
    write_metadata(&layout, Scope::Live, "demo", "1.10.0");

    let store = MetadataStore::new(&layout);
    let path = store
        .resolve_version_file("demo", "latest", Scope::Live)
        .unwrap();
    assert!(path.ends_with("metadata_files/demo-1.10.0.metadata"));
}

#[test]
fn test_exact_constraint_requires_known_version() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "demo", "1.0.0");

    let store = MetadataStore::new(&layout);
    assert!(store
        .resolve_version_file("demo", "1.0.0", Scope::Live)
        .is_ok());

    let err = store
        .resolve_version_file("demo", "2.0.0", Scope::Live)
        .unwrap_err();
    assert!(err.is(&kinds().package_metadata_not_found));
}

#[test]
fn test_at_least_resolves_to_newest() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "demo", "1.0.0");
    write_metadata(&layout, Scope::Live, "demo", "2.0.0");

    let store = MetadataStore::new(&layout);
    let path = store
        .resolve_version_file("demo", "^1.0.0", Scope::Live)
        .unwrap();
    assert!(path.ends_with("metadata_files/demo-2.0.0.metadata"));
}

#[test]
fn test_at_least_beyond_known_versions_fails() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "demo", "1.0.0");

    let store = MetadataStore::new(&layout);
    let err = store
        .resolve_version_file("demo", "^3.0.0", Scope::Live)
        .unwrap_err();
    assert!(err.is(&kinds().package_metadata_not_found));
}

#[test]
fn test_at_most_resolves_to_oldest() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "demo", "1.0.0");
    write_metadata(&layout, Scope::Live, "demo", "2.0.0");

    let store = MetadataStore::new(&layout);
    let path = store
        .resolve_version_file("demo", "_1.5.0", Scope::Live)
        .unwrap();
    assert!(path.ends_with("metadata_files/demo-1.0.0.metadata"));
}

#[test]
fn test_prefix_resolves_to_newest_match() {
    let (_root, layout) = layout();
    for version in ["1.2.0", "1.2.5", "1.3.0"] {
        write_metadata(&layout, Scope::Live, "demo", version);
    }

    let store = MetadataStore::new(&layout);
    let path = store
        .resolve_version_file("demo", "~1.2", Scope::Live)
        .unwrap();
    assert!(path.ends_with("metadata_files/demo-1.2.5.metadata"));
}

#[test]
fn test_prefix_without_match_fails() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "demo", "2.0.0");

    let store = MetadataStore::new(&layout);
    let err = store
        .resolve_version_file("demo", "~1.2", Scope::Live)
        .unwrap_err();
    assert!(err.is(&kinds().package_metadata_not_found));
}

#[test]
fn test_unknown_package_fails() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "other", "1.0.0");

    let store = MetadataStore::new(&layout);
    let err = store
        .resolve_version_file("demo", "latest", Scope::Live)
        .unwrap_err();
    assert!(err.is(&kinds().package_metadata_not_found));
}

#[test]
fn test_unparsable_version_token_is_internal_error() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "demo", "1.0.0");
    fs::write(
        layout.metadata_dir().join("demo-oops.metadata"),
        "[package]\nname = \"demo\"\nversion = \"oops\"\n",
    )
    .unwrap();

    let store = MetadataStore::new(&layout);
    let err = store
        .resolve_version_file("demo", "latest", Scope::Live)
        .unwrap_err();
    assert!(err.is(&kinds().internal));
}

#[test]
fn test_hyphenated_package_names_resolve() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "core-math", "2.1.0");

    let store = MetadataStore::new(&layout);
    let path = store
        .resolve_version_file("core-math", "latest", Scope::Live)
        .unwrap();
    assert!(path.ends_with("metadata_files/core-math-2.1.0.metadata"));

    // "core" must not claim "core-math" files.
    let err = store
        .resolve_version_file("core", "latest", Scope::Live)
        .unwrap_err();
    assert!(err.is(&kinds().package_metadata_not_found));
}

#[test]
fn test_scopes_resolve_independently() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "demo", "1.0.0");
    write_metadata(&layout, Scope::Cached, "demo", "1.0.0");
    write_metadata(&layout, Scope::Cached, "demo", "2.0.0");

    let store = MetadataStore::new(&layout);
    let live = store
        .resolve_version_file("demo", "latest", Scope::Live)
        .unwrap();
    assert!(live.ends_with("metadata_files/demo-1.0.0.metadata"));

    let cached = store
        .resolve_version_file("demo", "latest", Scope::Cached)
        .unwrap();
    assert!(cached.ends_with("metadata_files/cached/demo-2.0.0.metadata"));
}

#[test]
fn test_load_parses_document() {
    let (_root, layout) = layout();
    let dir = layout.metadata_dir();
    fs::write(
        dir.join("demo-1.0.0.metadata"),
        "[package]\nname = \"demo\"\nversion = \"1.0.0\"\nlicense = \"MIT\"\n\n[dependencies]\nhelper = \"^2.0\"\n",
    )
    .unwrap();

    let store = MetadataStore::new(&layout);
    let metadata = store.load("demo", "latest").unwrap();
    assert_eq!(metadata.package.version, "1.0.0");
    assert_eq!(metadata.package.license.as_deref(), Some("MIT"));
    assert_eq!(
        metadata.dependencies.get("helper").map(String::as_str),
        Some("^2.0")
    );
}

#[test]
fn test_malformed_document_is_internal_error() {
    let (_root, layout) = layout();
    fs::write(
        layout.metadata_dir().join("demo-1.0.0.metadata"),
        "not toml at all [",
    )
    .unwrap();

    let store = MetadataStore::new(&layout);
    let err = store.load("demo", "latest").unwrap_err();
    assert!(err.is(&kinds().internal));
}

#[test]
fn test_save_writes_both_scopes() {
    let (_root, layout) = layout();
    let metadata = PackageMetadata::from_toml_str(
        "[package]\nname = \"demo\"\nversion = \"1.0.0\"\n",
    )
    .unwrap();

    let store = MetadataStore::new(&layout);
    store.save(&metadata).unwrap();

    assert!(layout.metadata_dir().join("demo-1.0.0.metadata").is_file());
    assert!(layout
        .cached_metadata_dir()
        .join("demo-1.0.0.metadata")
        .is_file());
    assert_eq!(store.load("demo", "latest").unwrap(), metadata);
    assert_eq!(store.load_cached("demo", "latest").unwrap(), metadata);
}

#[test]
fn test_remove_deletes_both_scopes_and_tolerates_absence() {
    let (_root, layout) = layout();
    write_metadata(&layout, Scope::Live, "demo", "1.0.0");
    write_metadata(&layout, Scope::Cached, "demo", "1.0.0");

    let store = MetadataStore::new(&layout);
    store.remove("demo", "1.0.0").unwrap();
    assert!(!layout.metadata_dir().join("demo-1.0.0.metadata").exists());
    assert!(!layout
        .cached_metadata_dir()
        .join("demo-1.0.0.metadata")
        .exists());

    // A second removal finds nothing to delete and still succeeds.
    store.remove("demo", "1.0.0").unwrap();
}
