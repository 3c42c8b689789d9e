//! Filesystem scanning: entry discovery and build-output collection.

pub mod collector;
pub mod entries;
pub mod filters;

pub use collector::FileCollector;
pub use entries::discover_entries;
pub use filters::{ArtifactFilter, EntryFilter, FileFilter};

use modkit_core::error::Result;
use std::path::{Path, PathBuf};

/// Produced `.js` files (and `.js.map` when `include_maps`) under `build_root`
pub async fn collect_outputs(build_root: &Path, include_maps: bool) -> Result<Vec<PathBuf>> {
    let collector = FileCollector::new(ArtifactFilter::new(include_maps));
    collector.collect_async(&[build_root.to_path_buf()]).await
}
