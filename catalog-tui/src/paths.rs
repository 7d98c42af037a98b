//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "catalog";
const APPLICATION: &str = "catalog-tui";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

const LATEST_LOG: &str = "latest.log";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, where logs are written.
///
/// - Linux: `$XDG_CACHE_HOME/catalog-tui` or `~/.cache/catalog-tui`
/// - macOS: `~/Library/Caches/dev.catalog.catalog-tui`
/// - Windows: `C:\Users\<User>\AppData\Local\catalog\catalog-tui\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Rotate logs: rename latest.log to a timestamped name, clean up old logs.
///
/// Call this at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    if fs::create_dir_all(&cache).is_err() {
        return;
    }

    let latest = cache.join(LATEST_LOG);
    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let archived = cache.join(format!("{}.log", timestamp));
        let _ = fs::rename(&latest, &archived);
    }

    cleanup_old_logs(&cache);
}

/// Remove old log files, keeping only the most recent MAX_OLD_LOGS.
fn cleanup_old_logs(cache_dir: &Path) {
    let Ok(entries) = fs::read_dir(cache_dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}
