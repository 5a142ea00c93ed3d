//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use cachelab_delay::{Delay, DurationPolicy};
use cachelab_segments::DEFAULT_LATENCY;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Delay conversion and defaults.
    #[serde(default)]
    pub delay: DelayConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Segment defaults.
    #[serde(default)]
    pub segments: SegmentsConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Latency segments simulate.
    pub fn segment_latency(&self) -> Delay {
        Delay::from_millis(self.delay.default_ms)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Delay settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayConfig {
    /// How negative or non-finite millisecond input is handled.
    #[serde(default)]
    pub policy: DurationPolicy,

    /// Latency simulated by every segment, in milliseconds.
    #[serde(default = "default_ms")]
    pub default_ms: u64,
}

fn default_ms() -> u64 {
    DEFAULT_LATENCY.as_millis()
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            policy: DurationPolicy::default(),
            default_ms: default_ms(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Filter directive when `RUST_LOG` is unset (e.g. "warn", "cachelab_delay=debug").
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: default_level(),
        }
    }
}

/// Segment settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentsConfig {
    /// Locale used when `--locale` is not given.
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

fn default_locale() -> String {
    "en".to_string()
}

impl Default for SegmentsConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.delay.policy, DurationPolicy::Coerce);
        assert_eq!(config.delay.default_ms, 1000);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.segments.default_locale, "en");
        assert_eq!(config.segment_latency(), Delay::from_millis(1000));
    }

    #[test]
    fn test_partial_toml() {
        let config: CliConfig = toml::from_str(
            r#"
            [delay]
            policy = "reject"

            [segments]
            default_locale = "fr"
            "#,
        )
        .unwrap();

        assert_eq!(config.delay.policy, DurationPolicy::Reject);
        assert_eq!(config.delay.default_ms, 1000);
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.segments.default_locale, "fr");
    }

    #[test]
    fn test_save_and_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cachelab.toml");

        let mut config = CliConfig::default();
        config.delay.default_ms = 250;
        config.logging.format = LogFormat::Json;
        config.save(&path).unwrap();

        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cachelab.json");
        std::fs::write(&path, r#"{"delay": {"default_ms": 5}}"#).unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.delay.default_ms, 5);
        assert_eq!(config.delay.policy, DurationPolicy::Coerce);
    }

    #[test]
    fn test_load_reports_path() {
        let err = CliConfig::load("/nonexistent/cachelab.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/cachelab.toml"));
    }
}
