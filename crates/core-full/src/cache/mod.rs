//! Persisted build state and the change summaries derived from it.
//!
//! Both state files are best-effort: a missing or corrupt file means "no
//! previous build", and write failures are only logged. Diagnostics may be
//! routed to a discarding sink; persistence happens either way.

use modkit_core::config::constants::{MANIFEST_DIGEST_FILE, OUTPUT_SIZES_FILE};
use modkit_core::manifest::{ManifestDigest, ModuleManifest};
use modkit_core::outputs::{OutputDiff, OutputSizeMap};
use modkit_core::DiagnosticSink;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CacheDiffReporter {
    state_dir: PathBuf,
}

impl CacheDiffReporter {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn outputs_path(&self) -> PathBuf {
        self.state_dir.join(OUTPUT_SIZES_FILE)
    }

    pub fn digest_path(&self) -> PathBuf {
        self.state_dir.join(MANIFEST_DIGEST_FILE)
    }

    /// Compare against the previous build, emit summaries, persist the new state
    pub async fn report<S: DiagnosticSink>(
        &self,
        outputs: &OutputSizeMap,
        manifest: &ModuleManifest,
        sink: &mut S,
    ) {
        self.report_outputs(outputs, sink).await;
        self.report_digest(&ManifestDigest::from_manifest(manifest), sink)
            .await;
    }

    async fn report_outputs<S: DiagnosticSink>(&self, outputs: &OutputSizeMap, sink: &mut S) {
        let path = self.outputs_path();
        if let Some(previous) = read_state::<OutputSizeMap>(&path).await {
            let diff = OutputDiff::compute(&previous, outputs);
            if !diff.is_empty() {
                sink.info(diff.summary());
            }
        }
        write_state(&self.state_dir, &path, outputs).await;
    }

    async fn report_digest<S: DiagnosticSink>(&self, digest: &ManifestDigest, sink: &mut S) {
        let path = self.digest_path();
        if let Some(previous) = read_state::<ManifestDigest>(&path).await {
            let diff = previous.diff(digest);
            if !diff.is_empty() {
                sink.info(diff.summary());
            }
        }
        write_state(&self.state_dir, &path, digest).await;
    }
}

async fn read_state<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = tokio::fs::read(path).await.ok()?;
    match serde_json::from_slice(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Ignoring corrupt state file {:?}: {}", path, e);
            None
        }
    }
}

async fn write_state<T: Serialize>(state_dir: &Path, path: &Path, value: &T) {
    let bytes = match serde_json::to_vec_pretty(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Could not serialise {:?}: {}", path, e);
            return;
        }
    };
    if let Err(e) = tokio::fs::create_dir_all(state_dir).await {
        debug!("Could not create {:?}: {}", state_dir, e);
        return;
    }
    if let Err(e) = tokio::fs::write(path, bytes).await {
        debug!("Could not write {:?}: {}", path, e);
    }
}
