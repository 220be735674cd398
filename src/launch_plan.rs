//! Resolves how the backend gets started. Three sources, first match wins:
//! an explicit command from the environment, a packaged Python runtime
//! shipped as a Tauri resource, or a development checkout of the web app.

use std::{env, path::PathBuf};

use tauri::AppHandle;

use crate::{
    runtime_paths, BackendError, LaunchPlan, RuntimeManifest, BACKEND_CMD_ENV, BACKEND_CWD_ENV,
};

const RUNTIME_MANIFEST_RESOURCE: &str = "backend/runtime-manifest.json";
const DEFAULT_ENTRYPOINT: &str = "webapp.py";

pub(crate) fn resolve_launch_plan(app: &AppHandle) -> Result<LaunchPlan, BackendError> {
    if let Some(custom_cmd) = env::var(BACKEND_CMD_ENV)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    {
        return resolve_custom_launch(&custom_cmd);
    }

    if let Some(plan) = resolve_packaged_launch(app)? {
        return Ok(plan);
    }

    resolve_dev_launch()
}

pub(crate) fn resolve_custom_launch(custom_cmd: &str) -> Result<LaunchPlan, BackendError> {
    let mut pieces = parse_custom_command(custom_cmd)?;
    let cmd = pieces.remove(0);
    let cwd = env::var(BACKEND_CWD_ENV)
        .map(PathBuf::from)
        .ok()
        .or_else(runtime_paths::detect_source_root)
        .unwrap_or_else(runtime_paths::workspace_root_dir);

    Ok(LaunchPlan {
        cmd,
        args: pieces,
        cwd,
        packaged_mode: false,
    })
}

fn parse_custom_command(custom_cmd: &str) -> Result<Vec<String>, BackendError> {
    let pieces = shlex::split(custom_cmd).ok_or_else(|| {
        BackendError::LaunchPlan(format!("Invalid {BACKEND_CMD_ENV}: {custom_cmd}"))
    })?;
    if pieces.is_empty() {
        return Err(BackendError::LaunchPlan(format!(
            "{BACKEND_CMD_ENV} is empty."
        )));
    }
    Ok(pieces)
}

fn resolve_packaged_launch(app: &AppHandle) -> Result<Option<LaunchPlan>, BackendError> {
    let manifest_path = match runtime_paths::resolve_resource_path(app, RUNTIME_MANIFEST_RESOURCE) {
        Some(path) if path.is_file() => path,
        _ => return Ok(None),
    };
    let backend_dir = manifest_path.parent().ok_or_else(|| {
        BackendError::LaunchPlan(format!(
            "Invalid backend manifest path: {}",
            manifest_path.display()
        ))
    })?;

    let manifest_text = std::fs::read_to_string(&manifest_path).map_err(|error| {
        BackendError::LaunchPlan(format!(
            "Failed to read packaged backend manifest {}: {}",
            manifest_path.display(),
            error
        ))
    })?;
    let manifest: RuntimeManifest = serde_json::from_str(&manifest_text).map_err(|error| {
        BackendError::LaunchPlan(format!(
            "Failed to parse packaged backend manifest {}: {}",
            manifest_path.display(),
            error
        ))
    })?;

    let default_python_relative = if cfg!(target_os = "windows") {
        PathBuf::from("python").join("Scripts").join("python.exe")
    } else {
        PathBuf::from("python").join("bin").join("python3")
    };
    let python_path = backend_dir.join(
        manifest
            .python
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or(default_python_relative),
    );
    if !python_path.is_file() {
        return Err(BackendError::LaunchPlan(format!(
            "Packaged runtime python executable is missing: {}",
            python_path.display()
        )));
    }

    let entrypoint_relative = manifest
        .entrypoint
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENTRYPOINT));
    let entry_script_path = backend_dir.join(entrypoint_relative);
    if !entry_script_path.is_file() {
        return Err(BackendError::LaunchPlan(format!(
            "Packaged backend entry script is missing: {}",
            entry_script_path.display()
        )));
    }

    let cwd = env::var(BACKEND_CWD_ENV)
        .map(PathBuf::from)
        .ok()
        .or_else(runtime_paths::data_root_dir)
        .unwrap_or_else(|| backend_dir.to_path_buf());

    Ok(Some(LaunchPlan {
        cmd: python_path.to_string_lossy().to_string(),
        args: vec![entry_script_path.to_string_lossy().to_string()],
        cwd,
        packaged_mode: true,
    }))
}

fn resolve_dev_launch() -> Result<LaunchPlan, BackendError> {
    let source_root = runtime_paths::detect_source_root().ok_or_else(|| {
        BackendError::LaunchPlan(format!(
            "Cannot locate the web application source directory (no webapp.py found). Set {}.",
            crate::SOURCE_DIR_ENV
        ))
    })?;

    Ok(LaunchPlan {
        cmd: "python3".to_string(),
        args: vec![DEFAULT_ENTRYPOINT.to_string()],
        cwd: env::var(BACKEND_CWD_ENV)
            .map(PathBuf::from)
            .unwrap_or(source_root),
        packaged_mode: false,
    })
}
