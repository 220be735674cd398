use std::{io, process::ExitStatus};

use thiserror::Error;

/// Startup and shutdown failures the supervisor distinguishes. The original
/// launcher collapsed all of these into one silent retry path; keeping them
/// apart lets the shell report *why* the backend never came up.
#[derive(Debug, Error)]
pub(crate) enum BackendError {
    #[error("Backend auto-start is disabled ({0}=0).")]
    AutoStartDisabled(&'static str),

    #[error("{0}")]
    LaunchPlan(String),

    #[error("Failed to spawn backend process with command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to construct readiness probe client: {0}")]
    ProbeClient(reqwest::Error),

    #[error("Backend process exited before becoming reachable: {status}")]
    ExitedEarly { status: ExitStatus },

    #[error("Failed to poll backend process status: {0}")]
    ChildStatus(io::Error),

    #[error("Backend process is not running.")]
    NotRunning,

    #[error("Timed out after {elapsed_ms}ms ({attempts} probe attempts) waiting for backend startup.")]
    StartupTimeout { elapsed_ms: u128, attempts: u32 },

    #[error("Backend process lock poisoned.")]
    LockPoisoned,
}
