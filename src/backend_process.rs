//! Backend child-process lifecycle: spawn with log redirection, the
//! ready-or-fail startup path, and interrupt-then-kill shutdown.

use std::{
    fs::{self, OpenOptions},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use tauri::AppHandle;

use crate::{
    append_shutdown_log, append_startup_log, backend_config, backend_readiness, launch_plan,
    logging, runtime_paths, BackendError, BackendState, LaunchPlan, BACKEND_AUTO_START_ENV,
    BACKEND_STOP_TIMEOUT_MS, PROBE_ATTEMPT_TIMEOUT_MS,
};

impl BackendState {
    /// Startup path: if something already answers at the backend address the
    /// shell attaches to it without spawning; otherwise it resolves a launch
    /// plan, spawns the backend and waits for readiness.
    pub(crate) fn ensure_backend_ready(&self, app: &AppHandle) -> Result<(), BackendError> {
        if backend_readiness::probe_once(
            &self.backend_url,
            Duration::from_millis(PROBE_ATTEMPT_TIMEOUT_MS),
        ) {
            append_startup_log("backend already reachable; skipping spawn");
            return Ok(());
        }

        if !backend_config::auto_start_enabled() {
            return Err(BackendError::AutoStartDisabled(BACKEND_AUTO_START_ENV));
        }

        let plan = launch_plan::resolve_launch_plan(app)?;
        append_startup_log(&format!("launching backend: {}", plan.debug_command()));
        self.spawn_backend(&plan)?;
        self.wait_for_backend(&plan)
    }

    pub(crate) fn spawn_backend(&self, plan: &LaunchPlan) -> Result<(), BackendError> {
        if self
            .child
            .lock()
            .map_err(|_| BackendError::LockPoisoned)?
            .is_some()
        {
            return Ok(());
        }

        if !plan.cwd.exists() {
            fs::create_dir_all(&plan.cwd).map_err(|error| BackendError::LaunchPlan(format!(
                "Failed to create backend cwd {}: {}",
                plan.cwd.display(),
                error
            )))?;
        }

        let mut command = Command::new(&plan.cmd);
        command
            .args(&plan.args)
            .current_dir(&plan.cwd)
            .stdin(Stdio::null())
            .env("PYTHONUNBUFFERED", "1")
            .env("PYTHONUTF8", "1");

        attach_backend_log(&mut command)?;

        let child = command.spawn().map_err(|source| BackendError::Spawn {
            command: plan.debug_command(),
            source,
        })?;
        append_startup_log(&format!("backend spawned with pid {}", child.id()));
        *self.child.lock().map_err(|_| BackendError::LockPoisoned)? = Some(child);
        Ok(())
    }

    /// Stops the backend if one is owned. The handle is taken out of the
    /// state first, so concurrent or repeated calls signal at most once.
    pub(crate) fn stop_backend(&self) {
        let child = match self.child.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(mut process) = child {
            append_shutdown_log(&format!("stopping backend pid {}", process.id()));
            stop_child_process(&mut process);
        }
    }
}

fn attach_backend_log(command: &mut Command) -> Result<(), BackendError> {
    let root_dir = runtime_paths::data_root_dir();
    let Some(log_path) = logging::backend_log_path(root_dir.as_deref()) else {
        command.stdout(Stdio::null());
        command.stderr(Stdio::null());
        return Ok(());
    };

    if let Some(log_parent) = log_path.parent() {
        fs::create_dir_all(log_parent).map_err(|error| {
            BackendError::LaunchPlan(format!(
                "Failed to create backend log directory {}: {}",
                log_parent.display(),
                error
            ))
        })?;
    }
    let stdout_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|error| {
            BackendError::LaunchPlan(format!(
                "Failed to open backend log {}: {}",
                log_path.display(),
                error
            ))
        })?;
    let stderr_file = stdout_file.try_clone().map_err(|error| {
        BackendError::LaunchPlan(format!("Failed to clone backend log handle: {error}"))
    })?;
    command.stdout(Stdio::from(stdout_file));
    command.stderr(Stdio::from(stderr_file));
    Ok(())
}

/// Interrupt first so the backend can flush and unbind, wait a bounded time,
/// then force-kill. Always reaps before returning.
fn stop_child_process(child: &mut Child) {
    #[cfg(target_os = "windows")]
    {
        let _ = Command::new("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        let _ = child.wait();
    }

    #[cfg(not(target_os = "windows"))]
    {
        let interrupted = Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        if interrupted && wait_for_exit(child, Duration::from_millis(BACKEND_STOP_TIMEOUT_MS)) {
            return;
        }

        let _ = child.kill();
        let _ = child.wait();
    }
}

#[cfg(not(target_os = "windows"))]
fn wait_for_exit(child: &mut Child, timeout: Duration) -> bool {
    let start_time = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return true,
            Ok(None) => {}
            Err(_) => return false,
        }
        if start_time.elapsed() >= timeout {
            return false;
        }
        thread::sleep(Duration::from_millis(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn state_with_url(url: &str) -> BackendState {
        BackendState {
            child: Mutex::new(None),
            backend_url: url.to_string(),
        }
    }

    #[cfg(unix)]
    #[test]
    fn stop_backend_interrupts_a_live_child_exactly_once() {
        let child = Command::new("sleep")
            .arg("30")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn sleep");

        let state = state_with_url("http://127.0.0.1:5000/");
        *state.child.lock().expect("child lock") = Some(child);

        state.stop_backend();
        assert!(state.child.lock().expect("child lock").is_none());

        // Second stop finds no handle to signal.
        state.stop_backend();
    }

    #[cfg(unix)]
    #[test]
    fn wait_for_exit_returns_true_for_exited_child() {
        let mut child = Command::new("true")
            .stdin(Stdio::null())
            .spawn()
            .expect("spawn true");
        assert!(wait_for_exit(&mut child, Duration::from_secs(5)));
    }

    #[cfg(unix)]
    #[test]
    fn wait_for_exit_times_out_on_a_stubborn_child() {
        let mut child = Command::new("sleep")
            .arg("30")
            .stdin(Stdio::null())
            .spawn()
            .expect("spawn sleep");
        assert!(!wait_for_exit(&mut child, Duration::from_millis(200)));
        let _ = child.kill();
        let _ = child.wait();
    }

    #[test]
    fn spawn_backend_surfaces_missing_executable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = state_with_url("http://127.0.0.1:5000/");
        let plan = LaunchPlan {
            cmd: "definitely-not-a-real-binary-470".to_string(),
            args: vec![],
            cwd: dir.path().to_path_buf(),
            packaged_mode: false,
        };
        match state.spawn_backend(&plan) {
            Err(BackendError::Spawn { command, .. }) => {
                assert!(command.contains("definitely-not-a-real-binary-470"));
            }
            other => panic!("expected Spawn error, got {other:?}"),
        }
        assert!(state.child.lock().expect("child lock").is_none());
    }

    #[test]
    fn spawn_backend_is_a_noop_while_a_child_is_held() {
        let state = state_with_url("http://127.0.0.1:5000/");
        let child = Command::new(if cfg!(windows) { "cmd" } else { "true" })
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn");
        *state.child.lock().expect("child lock") = Some(child);

        let plan = LaunchPlan {
            cmd: "definitely-not-a-real-binary-470".to_string(),
            args: vec![],
            cwd: std::env::temp_dir(),
            packaged_mode: false,
        };
        // Held child short-circuits before the bogus command is touched.
        state
            .spawn_backend(&plan)
            .expect("second spawn should be a no-op");

        state.stop_backend();
    }
}
