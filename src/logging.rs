//! File-append logging for the shell itself. The backend's own output goes to
//! `logs/backend.log` (see `backend_process`); these helpers cover the shell's
//! startup/shutdown breadcrumbs. Logging must never fail an operation, so
//! every error here is swallowed after a best-effort stderr echo.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{runtime_paths, BACKEND_LOG_FILE, DESKTOP_LOG_FILE};

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => std::env::temp_dir().join(file_name),
    }
}

pub(crate) fn backend_log_path(root_dir: Option<&Path>) -> Option<PathBuf> {
    root_dir.map(|root| root.join("logs").join(BACKEND_LOG_FILE))
}

pub(crate) fn append_startup_log(message: &str) {
    append_line(&format!("[startup] {message}"));
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_line(&format!("[shutdown] {message}"));
}

fn append_line(message: &str) {
    let line = format!(
        "{} {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        message
    );
    eprintln!("{line}");

    let path = resolve_desktop_log_path(runtime_paths::data_root_dir(), DESKTOP_LOG_FILE);
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) {
        let _ = writeln!(file, "{line}");
    }
}
