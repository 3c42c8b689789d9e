//! Output-size maps and their diff.

use crate::config::constants::CHANGED_OUTPUT_NAME_LIMIT;
use crate::util::text::{plural, summarize_names};
use std::collections::BTreeMap;

/// Build-output-relative path -> byte size
pub type OutputSizeMap = BTreeMap<String, u64>;

/// Paths whose size changed and paths no longer produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputDiff {
    pub changed: Vec<String>,
    pub removed: Vec<String>,
}

impl OutputDiff {
    pub fn compute(previous: &OutputSizeMap, current: &OutputSizeMap) -> Self {
        let changed = current
            .iter()
            .filter(|(path, size)| previous.get(*path).is_some_and(|old| old != *size))
            .map(|(path, _)| path.clone())
            .collect();
        let removed = previous
            .keys()
            .filter(|path| !current.contains_key(*path))
            .cloned()
            .collect();
        Self { changed, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }

    /// One-line summary, e.g. `Build outputs: changed 1 file, removed 0 files (index.js)`
    pub fn summary(&self) -> String {
        let mut message = format!(
            "Build outputs: changed {}, removed {}",
            plural(self.changed.len(), "file"),
            plural(self.removed.len(), "file")
        );
        if !self.changed.is_empty() {
            message.push_str(&format!(
                " ({})",
                summarize_names(&self.changed, CHANGED_OUTPUT_NAME_LIMIT)
            ));
        }
        message
    }
}
