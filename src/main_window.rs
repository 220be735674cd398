use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};
use url::Url;

use crate::{
    append_startup_log, MAIN_WINDOW_HEIGHT, MAIN_WINDOW_LABEL, MAIN_WINDOW_TITLE,
    MAIN_WINDOW_WIDTH,
};

/// Builds the main window on the backend address. Called only after the
/// readiness wait has succeeded; the label guard keeps the window unique even
/// if the startup path were ever re-entered.
pub(crate) fn create_main_window(app_handle: &AppHandle, backend_url: &str) -> Result<(), String> {
    if app_handle.get_webview_window(MAIN_WINDOW_LABEL).is_some() {
        append_startup_log("main window already exists; skipping creation");
        return Ok(());
    }

    let url = Url::parse(backend_url)
        .map_err(|error| format!("Invalid backend URL {backend_url}: {error}"))?;

    WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, WebviewUrl::External(url))
        .title(MAIN_WINDOW_TITLE)
        .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))?;

    append_startup_log(&format!("main window opened on {backend_url}"));
    Ok(())
}

/// Second app instances land here via the single-instance plugin.
pub(crate) fn focus_main_window(app_handle: &AppHandle) {
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        let _ = window.show();
        let _ = window.set_focus();
    }
}
