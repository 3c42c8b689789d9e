// Unit tests for error handling
use std::io;
use modkit_core::error::ModkitError;

#[test]
fn test_error_from_io() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: ModkitError = io_err.into();

    assert!(matches!(err, ModkitError::Io(_)));
    assert!(err.to_string().contains("I/O error"));
}

#[test]
fn test_error_from_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: ModkitError = json_err.into();

    assert!(matches!(err, ModkitError::Json(_)));
    assert!(err.to_string().starts_with("JSON error"));
}

#[test]
fn test_error_missing_input() {
    let err = ModkitError::missing_input("context");
    assert!(matches!(err, ModkitError::MissingInput(_)));
    assert_eq!(err.to_string(), "Missing required input: context");
}

#[test]
fn test_fatal_errors_are_generic() {
    assert_eq!(ModkitError::TypeCheckFailed.to_string(), "Type check failed");
    assert_eq!(ModkitError::BuildFailed.to_string(), "Build failed");
}

#[test]
fn test_error_toolchain() {
    let err = ModkitError::toolchain("esbuild not found");
    assert_eq!(err.to_string(), "Toolchain error: esbuild not found");
}

#[test]
fn test_error_from_str() {
    let err: ModkitError = "something broke".into();
    assert!(matches!(err, ModkitError::Other(_)));
    assert_eq!(err.to_string(), "something broke");
}
