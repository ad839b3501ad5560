//! Hand Puppets desktop launcher.
//!
//! Starts the local backend, waits for its loopback HTTPS endpoint to answer
//! and then swaps the loading screen for the served UI. The Tauri shell lives
//! behind the `desktop` feature; everything else is plain library code.

mod app_constants;
pub mod app_types;
pub mod backend_config;
pub mod backend_readiness;
pub mod backend_supervisor;
pub mod backend_target;
pub mod error;
pub mod logging;
pub mod media_permission;
pub mod process_control;
pub mod runtime_paths;
pub mod startup_task;

#[cfg(feature = "desktop")]
mod app_runtime;
#[cfg(feature = "desktop")]
mod exit_events;
#[cfg(feature = "desktop")]
mod main_window;

use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

pub use app_constants::*;
pub use app_types::{BackendTarget, LauncherState, ReadinessState, RunMode};
#[cfg(feature = "desktop")]
pub use app_runtime::run;

static DESKTOP_LOG_WRITE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static DESKTOP_LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

pub fn desktop_log_path() -> &'static PathBuf {
    DESKTOP_LOG_PATH.get_or_init(|| {
        logging::resolve_desktop_log_path(runtime_paths::default_root_dir(), DESKTOP_LOG_FILE)
    })
}

pub fn reset_desktop_log() -> std::io::Result<()> {
    logging::reset_desktop_log(desktop_log_path(), &DESKTOP_LOG_WRITE_LOCK)
}

pub fn append_startup_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Startup, message);
}

pub fn append_backend_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Backend, message);
}

pub fn append_readiness_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Readiness, message);
}

pub fn append_permission_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Permission, message);
}

pub fn append_shutdown_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Shutdown, message);
}

fn append_desktop_log_with_category(category: logging::DesktopLogCategory, message: &str) {
    logging::append_desktop_log(
        category,
        message,
        desktop_log_path(),
        &DESKTOP_LOG_WRITE_LOCK,
    )
}
