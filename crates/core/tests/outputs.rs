// Unit tests for output-size and manifest-digest diffs
use modkit_core::artifact::{index_entry_points, ArtifactKind, ArtifactRecord};
use modkit_core::manifest::{ManifestDigest, ModuleManifest, RouteDefinition, ViewDefinition};
use modkit_core::outputs::{OutputDiff, OutputSizeMap};

fn sizes(entries: &[(&str, u64)]) -> OutputSizeMap {
    entries.iter().map(|(p, s)| (p.to_string(), *s)).collect()
}

#[test]
fn test_output_diff_changed_and_removed() {
    let previous = sizes(&[("index.js", 100), ("jobs/a/index.js", 10), ("old.js", 5)]);
    let current = sizes(&[("index.js", 150), ("jobs/a/index.js", 10), ("new.js", 1)]);

    let diff = OutputDiff::compute(&previous, &current);
    assert_eq!(diff.changed, vec!["index.js"]);
    assert_eq!(diff.removed, vec!["old.js"]);
    assert_eq!(
        diff.summary(),
        "Build outputs: changed 1 file, removed 1 file (index.js)"
    );
}

#[test]
fn test_output_diff_identical_is_empty() {
    let current = sizes(&[("index.js", 150)]);
    assert!(OutputDiff::compute(&current, &current).is_empty());
    // Added outputs alone are not a change
    assert!(OutputDiff::compute(&OutputSizeMap::new(), &current).is_empty());
}

#[test]
fn test_output_diff_truncates_names() {
    let previous = sizes(&[("a.js", 1), ("b.js", 1), ("c.js", 1), ("d.js", 1), ("e.js", 1), ("f.js", 1), ("g.js", 1)]);
    let current = sizes(&[("a.js", 2), ("b.js", 2), ("c.js", 2), ("d.js", 2), ("e.js", 2), ("f.js", 2), ("g.js", 2)]);
    let summary = OutputDiff::compute(&previous, &current).summary();
    assert!(summary.contains("changed 7 files"));
    assert!(summary.ends_with("(a.js, b.js, c.js, d.js, e.js, +2 more)"));
}

fn manifest_with(routes: &[(&str, &str)], views: &[&str]) -> ModuleManifest {
    let mut manifest = ModuleManifest::minimal("m", "1.0.0");
    manifest.routes = routes
        .iter()
        .map(|(method, path)| RouteDefinition {
            method: method.to_string(),
            path: path.to_string(),
            name: None,
            description: None,
            auth: None,
        })
        .collect();
    manifest.views = views
        .iter()
        .map(|path| ViewDefinition {
            path: path.to_string(),
            name: None,
            title: None,
        })
        .collect();
    manifest
}

#[test]
fn test_digest_diff() {
    let before = ManifestDigest::from_manifest(&manifest_with(
        &[("GET", "/a"), ("POST", "/b/")],
        &["/dash"],
    ));
    let after = ManifestDigest::from_manifest(&manifest_with(
        &[("GET", "/a"), ("DELETE", "/c")],
        &["/dash", "/settings"],
    ));

    assert!(before.route_keys.contains("POST /b"));
    let diff = before.diff(&after);
    assert_eq!(diff.routes_added, vec!["DELETE /c"]);
    assert_eq!(diff.routes_removed, vec!["POST /b"]);
    assert_eq!(diff.views_added, vec!["/settings"]);
    assert!(diff.views_removed.is_empty());
    assert_eq!(
        diff.summary(),
        "Manifest changes: routes +1/-1; views +1/-0 (+DELETE /c; -POST /b; +/settings)"
    );
    assert!(after.diff(&after).is_empty());
}

#[test]
fn test_digest_round_trips_through_json() {
    let digest = ManifestDigest::from_manifest(&manifest_with(&[("GET", "/a")], &[]));
    let json = serde_json::to_value(&digest).unwrap();
    assert_eq!(json["routeKeys"], serde_json::json!(["GET /a"]));
    let back: ManifestDigest = serde_json::from_value(json).unwrap();
    assert_eq!(back, digest);
}

#[test]
fn test_artifact_classification() {
    assert_eq!(ArtifactRecord::new("/w/dist/index.js").kind, ArtifactKind::Bundle);
    assert_eq!(ArtifactRecord::new("/w/dist/index.js.map").kind, ArtifactKind::Asset);

    let json = serde_json::to_value(ArtifactRecord::new("/w/dist/index.js.map")).unwrap();
    assert_eq!(json["type"], "asset");
}

#[test]
fn test_index_entry_points() {
    let paths = [
        "jobs/a/index.js",
        "index.js",
        "index.js.map",
        "module.js",
        "functions/hello/index.js",
    ];
    assert_eq!(
        index_entry_points(&paths),
        vec!["functions/hello/index.js", "index.js", "jobs/a/index.js"]
    );
}
