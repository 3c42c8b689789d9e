// Unit tests for TypedKey system
use std::path::PathBuf;
use modkit_core::pipeline::{ENTRIES, ENTRY_SIGNATURE, PipeMap, SOURCEMAPS};

#[test]
fn test_typed_key_basic() {
    let mut data = PipeMap::new();
    data.insert_typed(ENTRIES, vec![PathBuf::from("src/index.ts")]);

    let entries = data.get_typed(ENTRIES).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], PathBuf::from("src/index.ts"));
}

#[test]
fn test_typed_key_bool() {
    let mut data = PipeMap::new();
    data.insert_typed(SOURCEMAPS, true);

    assert_eq!(data.get_typed(SOURCEMAPS), Some(&true));
    assert!(data.contains("sourcemaps"));
}

#[test]
fn test_get_typed_mut_updates_in_place() {
    let mut data = PipeMap::new();
    data.insert_typed(ENTRY_SIGNATURE, "index.ts".to_string());

    data.get_typed_mut(ENTRY_SIGNATURE)
        .unwrap()
        .push_str("|jobs/a/index.ts");

    assert_eq!(
        data.get_typed(ENTRY_SIGNATURE).map(String::as_str),
        Some("index.ts|jobs/a/index.ts")
    );
}

#[test]
fn test_take_typed_removes_value() {
    let mut data = PipeMap::new();
    data.insert_typed(SOURCEMAPS, false);

    assert_eq!(data.take_typed(SOURCEMAPS), Some(false));
    assert!(!data.contains("sourcemaps"));
    assert_eq!(data.take_typed(SOURCEMAPS), None);
}

#[test]
fn test_require_reports_missing_key() {
    let data = PipeMap::new();
    let err = data.require(ENTRIES).unwrap_err();
    assert_eq!(err.to_string(), "Missing required input: entries");
}
