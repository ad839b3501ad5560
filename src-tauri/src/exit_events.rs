use tauri::{AppHandle, Manager};

use crate::{append_shutdown_log, LauncherState};

// Several of these fire on a normal quit; stop() tolerates repeats.

pub fn handle_main_window_destroyed(app_handle: &AppHandle) {
    stop_backend(app_handle, "main window destroyed");
}

pub fn handle_exit_requested(app_handle: &AppHandle) {
    stop_backend(app_handle, "exit requested");
}

pub fn handle_exit_event(app_handle: &AppHandle) {
    stop_backend(app_handle, "exit");
}

fn stop_backend(app_handle: &AppHandle, reason: &str) {
    let Some(state) = app_handle.try_state::<LauncherState>() else {
        append_shutdown_log(&format!("{reason}: launcher state unavailable, nothing to stop"));
        return;
    };

    append_shutdown_log(&format!("{reason}: stopping backend"));
    state.supervisor.stop(append_shutdown_log);
}
