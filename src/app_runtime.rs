use tauri::{Manager, RunEvent, WindowEvent};

use crate::{
    append_shutdown_log, append_startup_log, logging, main_window, runtime_paths, startup_task,
    BackendState, DESKTOP_LOG_FILE, MAIN_WINDOW_LABEL,
};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(runtime_paths::data_root_dir(), DESKTOP_LOG_FILE)
            .display()
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            main_window::focus_main_window(app);
        }))
        .manage(BackendState::default())
        .setup(|app| {
            startup_task::spawn_startup_task(app.handle().clone());
            Ok(())
        })
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }
            if let WindowEvent::CloseRequested { .. } = event {
                append_shutdown_log("main window close requested; shutting down");
            }
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            // Both events can fire on the way out; stop_backend takes the
            // child handle, so the interrupt is sent at most once.
            RunEvent::ExitRequested { .. } | RunEvent::Exit => {
                let state = app_handle.state::<BackendState>();
                state.stop_backend();
            }
            _ => {}
        });
}
