use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    backend_readiness::DisplaySurface, LOADING_PAGE, MAIN_WINDOW_LABEL, MAIN_WINDOW_TITLE,
};

pub fn create_main_window(app_handle: &AppHandle) -> tauri::Result<WebviewWindow> {
    let builder = WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::App(LOADING_PAGE.into()),
    )
    .title(MAIN_WINDOW_TITLE)
    .inner_size(1000.0, 800.0)
    .fullscreen(true)
    .focused(true);

    // WebView2 is the only engine that takes this switch; the backend serves a
    // self-signed certificate on loopback.
    #[cfg(target_os = "windows")]
    let builder = builder.additional_browser_args("--ignore-certificate-errors");

    builder.build()
}

pub fn focus_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("focus_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

/// Navigates the main webview away from the loading page.
pub struct MainWindowSurface {
    app_handle: AppHandle,
}

impl MainWindowSurface {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl DisplaySurface for MainWindowSurface {
    fn show_url(&self, url: &Url) -> Result<(), String> {
        let Some(window) = self.app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
            return Err("main window not found".to_string());
        };
        window
            .navigate(url.clone())
            .map_err(|error| format!("navigation failed: {error}"))
    }
}
