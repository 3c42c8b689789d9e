// Integration tests for watch mode with a fake bundler
mod common;

use common::{fake_toolchain, workspace_with, write, FakeBundler};
use modkit_core::{Diagnostic, Severity};
use modkit_core_full::manifest::JsonDefinitionLoader;
use modkit_core_full::toolchain::TypeCheckRunner;
use modkit_core_full::watch::checker_line_diagnostic;
use modkit_core_full::{watch, BuildOptions, Toolchain, WatchHandle};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn options(root: &Path, pairs: &[(&str, &str)]) -> BuildOptions {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    BuildOptions::new(root).env(env)
}

/// Poll the fake bundler until `done` holds or five seconds pass
async fn wait_until(bundler: &FakeBundler, done: impl Fn(&common::Calls) -> bool) -> bool {
    for _ in 0..200 {
        if done(&bundler.calls()) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    false
}

/// Everything emitted until the channel stays quiet for `quiet`
async fn drain(handle: &mut WatchHandle, quiet: Duration) -> Vec<Diagnostic> {
    let mut seen = Vec::new();
    while let Ok(Some(diagnostic)) = tokio::time::timeout(quiet, handle.next_diagnostic()).await {
        seen.push(diagnostic);
    }
    seen
}

#[tokio::test]
async fn test_failing_checker_does_not_block_bundling() {
    let dir = workspace_with(&[
        ("package.json", r#"{"name":"watched","version":"0.1.0"}"#),
        ("tsconfig.json", "{}"),
        ("src/index.ts", "export {}"),
    ]);
    let bundler = FakeBundler::new();
    let toolchain = Toolchain::new(
        Arc::new(bundler.clone()),
        TypeCheckRunner::new().with_program("false"),
        Arc::new(JsonDefinitionLoader),
    );

    let mut handle = watch(options(dir.path(), &[]), Some(toolchain))
        .await
        .unwrap();
    assert!(wait_until(&bundler, |c| c.rebuilds >= 1).await);
    let diagnostics = drain(&mut handle, Duration::from_millis(300)).await;
    handle.stop().await;

    assert_eq!(bundler.calls().contexts, 1);
    assert!(diagnostics
        .iter()
        .all(|d| !d.message.starts_with("Type check failed")
            && !d.message.starts_with("Rebuild failed")));
}

#[tokio::test]
async fn test_source_change_triggers_one_debounced_rebuild() {
    let dir = workspace_with(&[
        ("package.json", r#"{"name":"watched","version":"0.1.0"}"#),
        ("src/index.ts", "export {}"),
    ]);
    let bundler = FakeBundler::new();
    let opts = options(dir.path(), &[("MODKIT_SKIP_TYPECHECK", "1")]);

    let handle = watch(opts, Some(fake_toolchain(&bundler))).await.unwrap();
    assert!(wait_until(&bundler, |c| c.rebuilds == 1).await);

    write(dir.path(), "src/index.ts", "export const a = 1");
    write(dir.path(), "src/index.ts", "export const a = 2");
    assert!(wait_until(&bundler, |c| c.rebuilds == 2).await);
    tokio::time::sleep(Duration::from_millis(600)).await;

    let calls = bundler.calls();
    assert_eq!(calls.rebuilds, 2);
    assert_eq!(calls.contexts, 1);
    assert_eq!(calls.builds, 0);
    assert_eq!(calls.disposals, 0);

    handle.stop().await;
    assert_eq!(bundler.calls().disposals, 1);
}

#[tokio::test]
async fn test_missing_tsconfig_skips_checker() {
    let dir = workspace_with(&[("src/index.ts", "export {}")]);
    let bundler = FakeBundler::new();

    let mut handle = watch(options(dir.path(), &[]), Some(fake_toolchain(&bundler)))
        .await
        .unwrap();
    let first = handle.next_diagnostic().await.unwrap();
    assert_eq!(first.severity, Severity::Warn);
    assert!(first.message.contains("type-check watcher not started"));

    assert!(wait_until(&bundler, |c| c.rebuilds == 1).await);
    handle.stop().await;
}

#[test]
fn test_checker_line_classification() {
    let error = checker_line_diagnostic(
        "src/index.ts(3,7): error TS2322: Type 'string' is not assignable to type 'number'.",
    )
    .unwrap();
    assert_eq!(error.severity, Severity::Error);

    let info =
        checker_line_diagnostic("[12:00:01] Found 0 errors. Watching for file changes.").unwrap();
    assert_eq!(info.severity, Severity::Info);
    assert_eq!(
        info.message,
        "[12:00:01] Found 0 errors. Watching for file changes."
    );

    assert!(checker_line_diagnostic("   ").is_none());
    assert_eq!(
        checker_line_diagnostic("Starting compilation in watch mode...\r")
            .unwrap()
            .message,
        "Starting compilation in watch mode..."
    );
}
