//! Entry-point naming rules and the entry signature.

use crate::config::constants::{ENTRY_EXTENSIONS, ENTRY_GROUP_DIRS};

/// Whether a file name is `index.<ext>` with a supported entry extension
pub fn is_index_file(file_name: &str) -> bool {
    match file_name.split_once('.') {
        Some(("index", ext)) => ENTRY_EXTENSIONS.contains(&ext),
        _ => false,
    }
}

/// Whether a source-root-relative, `/`-separated path matches one of the
/// entry patterns: `index.*`, `functions/*/index.*`, `jobs/*/index.*`
pub fn is_entry_path(relative: &str) -> bool {
    let parts: Vec<&str> = relative.split('/').collect();
    match parts.as_slice() {
        [file] => is_index_file(file),
        [group, name, file] => {
            ENTRY_GROUP_DIRS.contains(group) && !name.is_empty() && is_index_file(file)
        }
        _ => false,
    }
}

/// Deterministic fingerprint of an entry set: sorted, deduplicated, `|`-joined.
///
/// Never depends on the order the filesystem enumerated the entries in.
pub fn entry_signature<S: AsRef<str>>(entries: &[S]) -> String {
    let mut sorted: Vec<&str> = entries.iter().map(|e| e.as_ref()).collect();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join("|")
}
