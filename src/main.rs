#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod backend_config;
mod backend_error;
mod backend_process;
mod backend_readiness;
mod launch_plan;
mod logging;
mod main_window;
mod runtime_paths;
mod startup_task;

pub(crate) use app_constants::*;
pub(crate) use app_types::{BackendState, LaunchPlan, RuntimeManifest};
pub(crate) use backend_error::BackendError;
pub(crate) use logging::{append_shutdown_log, append_startup_log};

fn main() {
    app_runtime::run();
}
