/// File filter implementations
use modkit_core::entry::is_entry_path;
use modkit_core::util::path::relative_slash_path;
use std::path::{Path, PathBuf};

/// File filter trait
pub trait FileFilter: Send + Sync {
    fn should_include(&self, path: &Path) -> bool;

    /// Dot-directories are skipped, as glob patterns do by default
    fn should_descend(&self, dir: &Path) -> bool {
        !dir.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
    }
}

/// Entry-point filter: `index.*`, `functions/*/index.*`, `jobs/*/index.*`
pub struct EntryFilter {
    source_root: PathBuf,
}

impl EntryFilter {
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }
}

impl FileFilter for EntryFilter {
    fn should_include(&self, path: &Path) -> bool {
        relative_slash_path(path, &self.source_root).is_some_and(|rel| is_entry_path(&rel))
    }
}

/// Build-output filter: `**/*.js`, plus `**/*.js.map` when sourcemaps were emitted
pub struct ArtifactFilter {
    include_maps: bool,
}

impl ArtifactFilter {
    pub fn new(include_maps: bool) -> Self {
        Self { include_maps }
    }
}

impl FileFilter for ArtifactFilter {
    fn should_include(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.ends_with(".js") || (self.include_maps && name.ends_with(".js.map"))
    }
}
