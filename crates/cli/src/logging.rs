//! Logging utilities for modkit

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use modkit_core::config::constants::{LOGS_DIR, STATE_DIR};

/// Generate unique log file path based on workspace directory, PID, and timestamp
pub fn get_log_file_path(root: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };
    let folder_name = root
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("unknown"))
        .to_string_lossy()
        .into_owned();

    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let pid = std::process::id();

    let logs_dir = root.join(STATE_DIR).join(LOGS_DIR);

    std::fs::create_dir_all(&logs_dir)?;

    let log_filename = format!("{folder_name}_{pid}_{timestamp}.log");
    Ok(logs_dir.join(log_filename))
}

/// Create log file with proper options
pub fn create_log_file(root: &Path) -> Result<std::fs::File, Box<dyn std::error::Error>> {
    let log_path = get_log_file_path(root)?;

    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    eprintln!("Log file created: {}", log_path.display());

    Ok(log_file)
}
