//! Compile-time defaults for the shell. Every value can be overridden through
//! the matching `TOPICS_*` environment variable where one is named here.

pub(crate) const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000/";

pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_TITLE: &str = "Topics Explorer";
pub(crate) const MAIN_WINDOW_WIDTH: f64 = 1200.0;
pub(crate) const MAIN_WINDOW_HEIGHT: f64 = 660.0;

pub(crate) const BACKEND_URL_ENV: &str = "TOPICS_BACKEND_URL";
pub(crate) const BACKEND_CMD_ENV: &str = "TOPICS_BACKEND_CMD";
pub(crate) const BACKEND_CWD_ENV: &str = "TOPICS_BACKEND_CWD";
pub(crate) const BACKEND_TIMEOUT_ENV: &str = "TOPICS_BACKEND_TIMEOUT_MS";
pub(crate) const BACKEND_AUTO_START_ENV: &str = "TOPICS_BACKEND_AUTO_START";
pub(crate) const SOURCE_DIR_ENV: &str = "TOPICS_SOURCE_DIR";
pub(crate) const DATA_ROOT_ENV: &str = "TOPICS_ROOT";

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const BACKEND_LOG_FILE: &str = "backend.log";

/// Per-attempt timeout for a single readiness probe.
pub(crate) const PROBE_ATTEMPT_TIMEOUT_MS: u64 = 800;

/// Backoff schedule between probe attempts: starts small, doubles, capped.
pub(crate) const PROBE_BACKOFF_INITIAL_MS: u64 = 200;
pub(crate) const PROBE_BACKOFF_MAX_MS: u64 = 2_000;

/// Overall startup deadline. Dev trees answer within seconds; a packaged
/// runtime's first start may unpack and compile, so it gets a longer ceiling.
pub(crate) const STARTUP_TIMEOUT_DEV_MS: u64 = 20_000;
pub(crate) const STARTUP_TIMEOUT_PACKAGED_MS: u64 = 5 * 60 * 1000;

/// How long to wait after the interrupt signal before force-killing.
pub(crate) const BACKEND_STOP_TIMEOUT_MS: u64 = 5_000;
