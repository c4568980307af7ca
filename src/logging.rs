//! Tracing setup
//!
//! Logs go to a file in the data directory so they never tear the terminal
//! UI. The filter comes from `BUDGET_SCREEN_LOG` and defaults to info for
//! this crate.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::AppPaths;
use crate::error::{BudgetError, BudgetResult};

pub const LOG_FILTER_ENV: &str = "BUDGET_SCREEN_LOG";
const DEFAULT_FILTER: &str = "budget_screen=info";

static INIT_LOGGING: Once = Once::new();

/// Install the global subscriber once; later calls are no-ops
pub fn init(paths: &AppPaths) -> BudgetResult<()> {
    let mut result = Ok(());
    INIT_LOGGING.call_once(|| {
        result = install(&paths.log_file());
        if result.is_ok() {
            tracing::info!(data_dir = %paths.base_dir().display(), "logging initialized");
        }
    });
    result
}

fn install(log_file: &Path) -> BudgetResult<()> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| {
            BudgetError::Io(format!(
                "Failed to open log file {}: {}",
                log_file.display(),
                e
            ))
        })?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| BudgetError::Config(format!("Failed to install log subscriber: {}", e)))
}
