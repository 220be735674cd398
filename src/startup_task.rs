//! Background startup flow: spawn the backend and wait for readiness off the
//! main thread, then hop back onto it to open the window. The window must not
//! exist before the first successful probe.

use std::thread;

use tauri::{AppHandle, Manager};

use crate::{append_startup_log, main_window, BackendState};

pub(crate) fn spawn_startup_task(app_handle: AppHandle) {
    thread::spawn(move || {
        let state = app_handle.state::<BackendState>();
        if let Err(error) = state.ensure_backend_ready(&app_handle) {
            show_startup_error(&app_handle, &error.to_string());
            return;
        }

        let backend_url = state.backend_url.clone();
        let main_thread_handle = app_handle.clone();
        let dispatched = app_handle.run_on_main_thread(move || {
            if let Err(error) = main_window::create_main_window(&main_thread_handle, &backend_url) {
                show_startup_error(&main_thread_handle, &error);
            }
        });
        if let Err(error) = dispatched {
            show_startup_error(
                &app_handle,
                &format!("Failed to dispatch window creation: {error}"),
            );
        }
    });
}

fn show_startup_error(app_handle: &AppHandle, message: &str) {
    append_startup_log(&format!("startup failed: {message}"));
    app_handle.exit(1);
}
