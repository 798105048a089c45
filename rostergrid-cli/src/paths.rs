//! Platform-specific directory paths and the log file.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "rostergrid";
const APPLICATION: &str = "rostergrid";

/// Maximum number of old log files to keep.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory, which holds the logs.
///
/// - Linux: `$XDG_CACHE_HOME/rostergrid` or `~/.cache/rostergrid`
/// - macOS: `~/Library/Caches/dev.rostergrid.rostergrid`
/// - Windows: `C:\Users\<User>\AppData\Local\rostergrid\rostergrid\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Rotate logs: rename latest.log to a timestamped name, clean up old logs.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    let latest = cache.join("latest.log");

    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let archived = cache.join(format!("{}.log", timestamp));
        let _ = fs::rename(&latest, &archived);
    }

    cleanup_old_logs(&cache);
}

fn cleanup_old_logs(cache_dir: &Path) {
    let Ok(entries) = fs::read_dir(cache_dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    // Oldest first
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

/// Rotates the logs and starts logging to a fresh `latest.log`.
///
/// Returns the log path. Logging stays off when no cache directory can be
/// created.
pub fn init_logging(level: LevelFilter) -> Option<PathBuf> {
    let path = log_file()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    rotate_logs();

    let file = File::create(&path).ok()?;
    WriteLogger::init(level, Config::default(), file).ok()?;
    Some(path)
}
