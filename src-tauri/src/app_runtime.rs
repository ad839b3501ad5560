use std::env;

use tauri::{AppHandle, Manager, RunEvent, WindowEvent};

use crate::{
    append_backend_log, append_permission_log, append_readiness_log, append_startup_log,
    backend_config, backend_readiness::HttpsLoopbackProbe, desktop_log_path, exit_events,
    main_window, media_permission::PermissionGate, runtime_paths,
    startup_task::start_backend_after_permission, LauncherState, RunMode, MAIN_WINDOW_LABEL,
    RUN_MODE_ENV,
};

pub fn run() {
    if let Err(error) = crate::reset_desktop_log() {
        eprintln!(
            "failed to reset desktop log {}: {error}",
            desktop_log_path().display()
        );
    }
    append_startup_log("desktop process starting");
    append_startup_log(&format!("desktop log path: {}", desktop_log_path().display()));

    let root_dir = runtime_paths::default_root_dir();
    let config = backend_config::resolve_launcher_config(
        root_dir.as_deref(),
        |key| env::var(key).ok(),
        append_startup_log,
    );
    let mode = RunMode::detect(env::var(RUN_MODE_ENV).ok().as_deref(), cfg!(debug_assertions));
    let state = LauncherState::new(mode, config);
    append_startup_log(&format!(
        "run mode: {} backend: {} endpoint: {}",
        mode.as_str(),
        state.config.backend_name,
        state.endpoint.url()
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            append_startup_log("second launcher instance requested; focusing main window");
            main_window::focus_main_window(app, append_startup_log);
        }))
        .manage(state)
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }
            if let WindowEvent::Destroyed = event {
                exit_events::handle_main_window_destroyed(window.app_handle());
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            if let Err(error) = main_window::create_main_window(&app_handle) {
                append_startup_log(&format!("failed to create main window: {error}"));
            }

            spawn_backend_startup_task(app_handle.clone());
            spawn_readiness_task(app_handle);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { .. } => exit_events::handle_exit_requested(app_handle),
            RunEvent::Exit => exit_events::handle_exit_event(app_handle),
            _ => {}
        });
}

fn spawn_backend_startup_task(app_handle: AppHandle) {
    tauri::async_runtime::spawn(async move {
        let state = app_handle.state::<LauncherState>();
        let resource_dir = match app_handle.path().resource_dir() {
            Ok(dir) => Some(dir),
            Err(error) => {
                append_backend_log(&format!("failed to resolve resource dir: {error}"));
                None
            }
        };
        let context = state.resolve_context(resource_dir);
        let gate = PermissionGate::for_current_platform();

        start_backend_after_permission(
            &gate,
            &state.supervisor,
            state.mode,
            &context,
            append_permission_log,
            append_backend_log,
        )
        .await;
    });
}

fn spawn_readiness_task(app_handle: AppHandle) {
    tauri::async_runtime::spawn(async move {
        let state = app_handle.state::<LauncherState>();
        let url = state.endpoint.url();
        let probe = match HttpsLoopbackProbe::new(&state.endpoint) {
            Ok(probe) => probe,
            Err(error) => {
                append_readiness_log(&format!("readiness polling disabled: {error}"));
                return;
            }
        };
        let surface = main_window::MainWindowSurface::new(app_handle.clone());

        state
            .poller
            .run(&probe, &surface, &url, append_readiness_log)
            .await;
    });
}
