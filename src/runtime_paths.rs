use std::{env, path::PathBuf};

use tauri::{path::BaseDirectory, AppHandle, Manager};

use crate::{DATA_ROOT_ENV, SOURCE_DIR_ENV};

pub(crate) fn workspace_root_dir() -> PathBuf {
    let candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    candidate
        .canonicalize()
        .unwrap_or_else(|_| candidate.clone())
}

/// Directory holding logs and runtime data for packaged installs.
pub(crate) fn data_root_dir() -> Option<PathBuf> {
    if let Ok(root) = env::var(DATA_ROOT_ENV) {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }
    home::home_dir().map(|home| home.join(".topics-explorer"))
}

/// Locates a development checkout of the web application, identified by its
/// `webapp.py` entry script.
pub(crate) fn detect_source_root() -> Option<PathBuf> {
    if let Ok(source_dir) = env::var(SOURCE_DIR_ENV) {
        let candidate = PathBuf::from(source_dir.trim());
        if candidate.join("webapp.py").is_file() {
            return Some(candidate.canonicalize().unwrap_or(candidate));
        }
    }

    let workspace_root = workspace_root_dir();
    let mut candidates = vec![workspace_root.clone(), workspace_root.join("webapp")];
    if let Some(parent) = workspace_root.parent() {
        candidates.push(parent.to_path_buf());
    }
    for candidate in candidates {
        if candidate.join("webapp.py").is_file() {
            return Some(candidate.canonicalize().unwrap_or(candidate));
        }
    }
    None
}

pub(crate) fn resolve_resource_path(app: &AppHandle, relative_path: &str) -> Option<PathBuf> {
    app.path()
        .resolve(relative_path, BaseDirectory::Resource)
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn detect_source_root_honors_env_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("webapp.py"), "# flask app\n").expect("write webapp.py");

        env::set_var(SOURCE_DIR_ENV, dir.path());
        let detected = detect_source_root();
        env::remove_var(SOURCE_DIR_ENV);

        let detected = detected.expect("env-configured source root should be found");
        assert!(detected.join("webapp.py").is_file());
    }
}
