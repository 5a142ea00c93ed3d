//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use cachelab_delay::{Delay, SharedScheduler, TokioScheduler};
use cachelab_segments::SegmentRegistry;

use crate::config::CliConfig;
use crate::output::Output;

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["cachelab.toml", ".cachelab.toml", "cachelab.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Scheduler every wait runs on.
    pub scheduler: SharedScheduler,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(PathBuf::from(path))),
            // Try to find config in current directory or parent directories
            None => match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            scheduler: Arc::new(TokioScheduler::new()),
        })
    }

    /// Parse a millisecond argument under the configured policy.
    pub fn parse_delay(&self, input: &str) -> Result<Delay> {
        self.config
            .delay
            .policy
            .parse(input)
            .with_context(|| format!("Invalid delay (policy: {})", self.config.delay.policy))
    }

    /// The demo segments, simulating the configured latency.
    pub fn registry(&self) -> SegmentRegistry {
        SegmentRegistry::demo(self.scheduler.clone(), self.config.segment_latency())
    }
}

/// Find config file in directory tree.
fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = CliConfig::load(&config_path) {
                    return Some((config, config_path));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            dir.path().join(".cachelab.toml"),
            "[segments]\ndefault_locale = \"nl\"\n",
        )
        .unwrap();

        let (config, path) = find_config(&nested).unwrap();
        assert_eq!(config.segments.default_locale, "nl");
        assert_eq!(path, dir.path().join(".cachelab.toml"));
    }

    #[test]
    fn test_find_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("inner");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("cachelab.toml"), "[delay]\ndefault_ms = 1\n").unwrap();
        std::fs::write(nested.join("cachelab.toml"), "[delay]\ndefault_ms = 2\n").unwrap();

        let (config, _) = find_config(&nested).unwrap();
        assert_eq!(config.delay.default_ms, 2);
    }
}
