//! Conformance tests that run YAML fixtures against trail
//!
//! Run with: cargo test -p trail-test --test conformance --features trail-test/fixtures
//!
//! Note: This test file requires the `fixtures` feature to be enabled.

#![cfg(feature = "fixtures")]

use std::fs;
use std::path::{Path, PathBuf};
use trail_test::fixture::Fixture;

/// The `fixtures` directory at the workspace root
fn fixtures_dir() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir)
        .parent() // ext
        .and_then(Path::parent) // workspace root
        .expect("Could not find workspace root")
        .join("fixtures")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    assert!(dir.exists(), "Fixtures directory does not exist: {}", dir.display());

    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.extension().is_some_and(|e| e == "yaml" || e == "yml"))
        .collect();
    entries.sort();
    assert!(!entries.is_empty(), "No fixtures in {}", dir.display());

    for path in entries {
        println!("Running fixture: {}", path.display());

        let yaml = fs::read_to_string(&path).expect("read yaml");

        // Parse potentially multiple fixtures (separated by ---)
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            println!("  Running: {}", fixture.name);
            fixture.run_and_assert();
        }
    }
}

#[test]
fn test_collection_selection() {
    run_fixtures_in_dir(&fixtures_dir().join("01_selection"));
}

#[test]
fn test_patterns() {
    run_fixtures_in_dir(&fixtures_dir().join("02_patterns"));
}

#[test]
fn test_reverse_urls() {
    run_fixtures_in_dir(&fixtures_dir().join("03_urls"));
}

#[test]
fn test_config_tables() {
    run_fixtures_in_dir(&fixtures_dir().join("04_config"));
}
