use std::{env, time::Duration};

use url::Url;

use crate::backend_readiness::RetryPolicy;
use crate::{
    BACKEND_AUTO_START_ENV, BACKEND_TIMEOUT_ENV, PROBE_BACKOFF_INITIAL_MS, PROBE_BACKOFF_MAX_MS,
    STARTUP_TIMEOUT_DEV_MS, STARTUP_TIMEOUT_PACKAGED_MS,
};

/// Normalizes the configured backend address; anything unparseable falls back
/// to the compiled default so the shell always probes a well-formed URL.
pub(crate) fn normalize_backend_url(raw: &str, default_url: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default_url.to_string();
    }

    match Url::parse(trimmed) {
        Ok(mut parsed) => {
            if parsed.path().is_empty() {
                parsed.set_path("/");
            }
            parsed.to_string()
        }
        Err(_) => default_url.to_string(),
    }
}

pub(crate) fn auto_start_enabled() -> bool {
    env::var(BACKEND_AUTO_START_ENV).unwrap_or_else(|_| "1".to_string()) != "0"
}

pub(crate) fn retry_policy(packaged_mode: bool) -> RetryPolicy {
    let parsed_timeout_ms = env::var(BACKEND_TIMEOUT_ENV)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok());

    RetryPolicy {
        initial_delay: Duration::from_millis(PROBE_BACKOFF_INITIAL_MS),
        max_delay: Duration::from_millis(PROBE_BACKOFF_MAX_MS),
        deadline: startup_deadline(parsed_timeout_ms, packaged_mode),
    }
}

/// `None` or `0` means "no explicit limit"; the shell still applies the
/// packaged ceiling rather than waiting forever.
fn startup_deadline(parsed_timeout_ms: Option<u64>, packaged_mode: bool) -> Duration {
    let default_ms = if packaged_mode {
        STARTUP_TIMEOUT_PACKAGED_MS
    } else {
        STARTUP_TIMEOUT_DEV_MS
    };
    match parsed_timeout_ms.unwrap_or(default_ms) {
        0 => Duration::from_millis(STARTUP_TIMEOUT_PACKAGED_MS),
        ms => Duration::from_millis(ms),
    }
}
