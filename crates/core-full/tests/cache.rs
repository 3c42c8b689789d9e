// Integration tests for the cache-diff reporter
use modkit_core::manifest::{ModuleManifest, RouteDefinition};
use modkit_core::outputs::OutputSizeMap;
use modkit_core::{Diagnostics, NullSink};
use modkit_core_full::cache::CacheDiffReporter;
use tempfile::TempDir;

fn sizes(size: u64) -> OutputSizeMap {
    OutputSizeMap::from([("index.js".to_string(), size)])
}

fn messages(diagnostics: &Diagnostics) -> Vec<String> {
    diagnostics.iter().map(|d| d.message.clone()).collect()
}

#[tokio::test]
async fn test_output_diff_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let reporter = CacheDiffReporter::new(dir.path().join(".modkit"));
    let manifest = ModuleManifest::minimal("m", "1.0.0");

    let mut first = Diagnostics::new();
    reporter.report(&sizes(100), &manifest, &mut first).await;
    assert!(first.is_empty());
    assert!(reporter.outputs_path().is_file());
    assert!(reporter.digest_path().is_file());

    let mut second = Diagnostics::new();
    reporter.report(&sizes(150), &manifest, &mut second).await;
    assert_eq!(second.len(), 1);
    assert!(messages(&second)[0].contains("changed 1 file"));

    let mut third = Diagnostics::new();
    reporter.report(&sizes(150), &manifest, &mut third).await;
    assert!(third.is_empty());
}

#[tokio::test]
async fn test_corrupt_state_is_treated_as_first_run() {
    let dir = TempDir::new().unwrap();
    let reporter = CacheDiffReporter::new(dir.path().join(".modkit"));
    std::fs::create_dir_all(dir.path().join(".modkit")).unwrap();
    std::fs::write(reporter.outputs_path(), "{not json").unwrap();
    std::fs::write(reporter.digest_path(), "[]").unwrap();

    let mut diagnostics = Diagnostics::new();
    reporter
        .report(&sizes(1), &ModuleManifest::minimal("m", "1.0.0"), &mut diagnostics)
        .await;
    assert!(diagnostics.is_empty());

    let persisted: OutputSizeMap =
        serde_json::from_slice(&std::fs::read(reporter.outputs_path()).unwrap()).unwrap();
    assert_eq!(persisted, sizes(1));
}

#[tokio::test]
async fn test_digest_reports_route_changes() {
    let dir = TempDir::new().unwrap();
    let reporter = CacheDiffReporter::new(dir.path().join(".modkit"));
    let before = ModuleManifest::minimal("m", "1.0.0");
    let mut after = before.clone();
    after.routes.push(RouteDefinition {
        method: "GET".to_string(),
        path: "/accounts/".to_string(),
        name: None,
        description: None,
        auth: None,
    });

    let mut first = Diagnostics::new();
    reporter.report(&sizes(1), &before, &mut first).await;
    assert!(first.is_empty());

    let mut second = Diagnostics::new();
    reporter.report(&sizes(1), &after, &mut second).await;
    assert_eq!(
        messages(&second),
        vec!["Manifest changes: routes +1/-0; views +0/-0 (+GET /accounts)"]
    );
}

#[tokio::test]
async fn test_quiet_sink_still_persists() {
    let dir = TempDir::new().unwrap();
    let reporter = CacheDiffReporter::new(dir.path().join(".modkit"));
    let manifest = ModuleManifest::minimal("m", "1.0.0");

    reporter.report(&sizes(100), &manifest, &mut NullSink).await;
    reporter.report(&sizes(150), &manifest, &mut NullSink).await;

    let persisted: OutputSizeMap =
        serde_json::from_slice(&std::fs::read(reporter.outputs_path()).unwrap()).unwrap();
    assert_eq!(persisted, sizes(150));

    let mut diagnostics = Diagnostics::new();
    reporter.report(&sizes(150), &manifest, &mut diagnostics).await;
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn test_unwritable_state_dir_is_silent() {
    let dir = TempDir::new().unwrap();
    // A file where the state directory should be
    let blocked = dir.path().join(".modkit");
    std::fs::write(&blocked, "").unwrap();
    let reporter = CacheDiffReporter::new(&blocked);

    let mut diagnostics = Diagnostics::new();
    reporter
        .report(&sizes(1), &ModuleManifest::minimal("m", "1.0.0"), &mut diagnostics)
        .await;
    assert!(diagnostics.is_empty());
}
