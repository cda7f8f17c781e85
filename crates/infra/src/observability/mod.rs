//! Logging setup
//!
//! The library only emits `tracing` events. Binaries and test harnesses call
//! [`init_tracing`] once to install a formatter; `RUST_LOG` overrides the
//! default filter when set.

use ctgforge_domain::{CtgError, Result};
use tracing_subscriber::EnvFilter;

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install a global subscriber filtered by `RUST_LOG` or `default_filter`
///
/// # Errors
/// Returns `CtgError::Config` if the filter does not parse or a global
/// subscriber was already installed.
pub fn init_tracing(default_filter: &str, format: LogFormat) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| CtgError::Config(format!("Invalid log filter {default_filter:?}: {e}")))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| CtgError::Config(format!("Failed to install tracing subscriber: {e}")))
}
