use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopLogCategory {
    Startup,
    Backend,
    Readiness,
    Permission,
    Shutdown,
}

impl DesktopLogCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Backend => "backend",
            Self::Readiness => "readiness",
            Self::Permission => "permission",
            Self::Shutdown => "shutdown",
        }
    }
}

pub fn resolve_desktop_log_path(root_dir: Option<PathBuf>, log_file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(log_file_name),
        None => std::env::temp_dir().join(log_file_name),
    }
}

/// Truncates the log and writes the run header.
pub fn reset_desktop_log(path: &Path, write_lock: &OnceLock<Mutex<()>>) -> io::Result<()> {
    let _guard = lock_for_write(write_lock);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, "--- desktop launcher starting ---\n")
}

pub fn append_desktop_log(
    category: DesktopLogCategory,
    message: &str,
    path: &Path,
    write_lock: &OnceLock<Mutex<()>>,
) {
    let line = format_log_line(Local::now(), category, message);
    if cfg!(debug_assertions) {
        eprint!("{line}");
    }

    let _guard = lock_for_write(write_lock);
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = file.write_all(line.as_bytes());
    }
}

fn format_log_line(now: DateTime<Local>, category: DesktopLogCategory, message: &str) -> String {
    format!(
        "[{}] [{}] {}\n",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        category.as_str(),
        message
    )
}

fn lock_for_write(write_lock: &OnceLock<Mutex<()>>) -> std::sync::MutexGuard<'_, ()> {
    write_lock
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|error| error.into_inner())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn resolve_desktop_log_path_nests_under_logs_dir() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/tmp/launcher")), "desktop.log");
        assert_eq!(path, PathBuf::from("/tmp/launcher/logs/desktop.log"));
    }

    #[test]
    fn format_log_line_includes_timestamp_and_category() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 15).unwrap();
        let line = format_log_line(now, DesktopLogCategory::Readiness, "probe ok");
        assert_eq!(line, "[2024-05-01 09:30:15.000] [readiness] probe ok\n");
    }

    #[test]
    fn reset_truncates_previous_run_then_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("desktop.log");
        let lock = OnceLock::new();

        append_desktop_log(DesktopLogCategory::Startup, "old run", &path, &lock);
        reset_desktop_log(&path, &lock).unwrap();
        append_desktop_log(DesktopLogCategory::Backend, "spawned", &path, &lock);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("--- desktop launcher starting ---\n"));
        assert!(!contents.contains("old run"));
        assert!(contents.contains("[backend] spawned"));
    }
}
