use super::filters::FileFilter;
use modkit_core::error::Result;
use std::path::PathBuf;

/// Walks source paths and keeps the files a [`FileFilter`] accepts
pub struct FileCollector<F: FileFilter> {
    filter: F,
}

impl<F: FileFilter> FileCollector<F> {
    pub fn new(filter: F) -> Self {
        Self { filter }
    }

    /// Collect matching files under `sources`. Missing sources yield nothing;
    /// results are sorted so callers never depend on directory enumeration
    /// order.
    pub async fn collect_async(&self, sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = Vec::new();

        for source in sources {
            match tokio::fs::metadata(source).await {
                Ok(meta) if meta.is_dir() => pending.push(source.clone()),
                Ok(_) if self.filter.should_include(source) => files.push(source.clone()),
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    if self.filter.should_descend(&path) {
                        pending.push(path);
                    }
                } else if self.filter.should_include(&path) {
                    files.push(path);
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }
}
