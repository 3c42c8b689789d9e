// Integration tests for the type-check runner
mod common;

use common::workspace_with;
use modkit_core::config::BuildSettings;
use modkit_core::error::ModkitError;
use modkit_core::{Diagnostics, Severity};
use modkit_core_full::toolchain::{TypeCheckOutcome, TypeCheckRunner};
use modkit_core_full::Workspace;
use std::collections::HashMap;

fn settings(pairs: &[(&str, &str)]) -> BuildSettings {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    BuildSettings::from_env(&env)
}

#[tokio::test]
async fn test_skipped_by_environment() {
    let dir = workspace_with(&[("tsconfig.json", "{}")]);
    let workspace = Workspace::resolve(dir.path()).unwrap();
    let runner = TypeCheckRunner::new().with_program("definitely-not-a-real-tsc");

    let mut diagnostics = Diagnostics::new();
    let outcome = runner
        .run(&workspace, &settings(&[("MODKIT_SKIP_TYPECHECK", "1")]), &mut diagnostics)
        .await
        .unwrap();
    assert_eq!(outcome, TypeCheckOutcome::Skipped);
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn test_missing_config_is_soft_pass() {
    let dir = workspace_with(&[]);
    let workspace = Workspace::resolve(dir.path()).unwrap();

    let mut diagnostics = Diagnostics::new();
    let outcome = TypeCheckRunner::new()
        .run(&workspace, &settings(&[]), &mut diagnostics)
        .await
        .unwrap();
    assert_eq!(outcome, TypeCheckOutcome::MissingConfig);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics.as_slice()[0].severity, Severity::Warn);
}

#[tokio::test]
async fn test_missing_checker_is_soft_pass() {
    let dir = workspace_with(&[("tsconfig.json", "{}")]);
    let workspace = Workspace::resolve(dir.path()).unwrap();
    let runner = TypeCheckRunner::new().with_program("definitely-not-a-real-tsc");

    let mut diagnostics = Diagnostics::new();
    let outcome = runner
        .run(&workspace, &settings(&[("MODKIT_MODE", "publish")]), &mut diagnostics)
        .await
        .unwrap();
    assert_eq!(outcome, TypeCheckOutcome::ToolMissing);
    assert_eq!(diagnostics.as_slice()[0].severity, Severity::Warn);
}

#[cfg(unix)]
#[tokio::test]
async fn test_passing_checker() {
    let dir = workspace_with(&[("tsconfig.json", "{}")]);
    let workspace = Workspace::resolve(dir.path()).unwrap();

    let mut diagnostics = Diagnostics::new();
    let outcome = TypeCheckRunner::new()
        .with_program("true")
        .run(&workspace, &settings(&[]), &mut diagnostics)
        .await
        .unwrap();
    assert_eq!(outcome, TypeCheckOutcome::Passed);
    assert!(diagnostics.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_checker_is_fatal_with_diagnostic() {
    let dir = workspace_with(&[("tsconfig.json", "{}")]);
    let workspace = Workspace::resolve(dir.path()).unwrap();

    let mut diagnostics = Diagnostics::new();
    let result = TypeCheckRunner::new()
        .with_program("false")
        .run(&workspace, &settings(&[("MODKIT_SKIP_TYPECHECK", "1"), ("MODKIT_MODE", "publish")]), &mut diagnostics)
        .await;

    assert!(matches!(result, Err(ModkitError::TypeCheckFailed)));
    assert!(diagnostics.has_errors());
    assert!(diagnostics.as_slice()[0].message.starts_with("Type check failed"));
}
