//! Log subscriber setup.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format (for development).
    #[default]
    Human,
    /// JSON format (for log aggregation).
    Json,
}

/// Filter used when `RUST_LOG` is unset.
fn filter_directive(config: &LoggingConfig, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        config.level.clone()
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for command output.
pub fn init(config: &LoggingConfig, verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config, verbose)));

    let format = if json { LogFormat::Json } else { config.format };
    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests); keep the existing one.
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Human => builder.try_init(),
    };
}
