use serde::Deserialize;
use std::{
    env,
    path::PathBuf,
    process::Child,
    sync::Mutex,
};

use crate::{backend_config, DEFAULT_BACKEND_URL};

/// Manifest bundled next to a packaged Python runtime, describing where the
/// interpreter and the entry script live relative to the manifest itself.
#[derive(Debug, Deserialize)]
pub(crate) struct RuntimeManifest {
    pub(crate) python: Option<String>,
    pub(crate) entrypoint: Option<String>,
}

/// Resolved command line for the backend process.
#[derive(Debug)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    pub(crate) packaged_mode: bool,
}

impl LaunchPlan {
    /// Command line joined for log and error messages.
    pub(crate) fn debug_command(&self) -> String {
        let mut parts = vec![self.cmd.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Shared shell state: the one backend child handle and the address it is
/// expected to bind. At most one child exists at a time; the window layer
/// never runs before the readiness wait on `backend_url` succeeds.
#[derive(Debug)]
pub(crate) struct BackendState {
    pub(crate) child: Mutex<Option<Child>>,
    pub(crate) backend_url: String,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            child: Mutex::new(None),
            backend_url: backend_config::normalize_backend_url(
                &env::var(crate::BACKEND_URL_ENV)
                    .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
                DEFAULT_BACKEND_URL,
            ),
        }
    }
}
