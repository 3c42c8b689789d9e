use super::collector::FileCollector;
use super::filters::EntryFilter;
use modkit_core::entry::entry_signature;
use modkit_core::error::Result;
use modkit_core::util::path::relative_slash_path;
use std::path::{Path, PathBuf};

/// Entry files under `source_root`: root `index.*`, `functions/*/index.*`
/// and `jobs/*/index.*`. Sorted and deduplicated; a missing root yields none.
pub async fn discover_entries(source_root: &Path) -> Result<Vec<PathBuf>> {
    let collector = FileCollector::new(EntryFilter::new(source_root));
    collector.collect_async(&[source_root.to_path_buf()]).await
}

/// Signature of an entry set relative to `source_root`
pub fn signature_for(entries: &[PathBuf], source_root: &Path) -> String {
    let relative: Vec<String> = entries
        .iter()
        .map(|e| relative_slash_path(e, source_root).unwrap_or_else(|| e.display().to_string()))
        .collect();
    entry_signature(&relative)
}
