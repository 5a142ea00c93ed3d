//! CLI command implementations.

pub mod config;
pub mod load;
pub mod race;
pub mod segments;
pub mod wait;

use clap::{Args, Subcommand};

/// Arguments for the wait command.
#[derive(Args)]
pub struct WaitArgs {
    /// Milliseconds to wait.
    #[arg(allow_hyphen_values = true)]
    pub ms: String,

    /// Don't show a spinner while waiting.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the race command.
#[derive(Args)]
pub struct RaceArgs {
    /// Milliseconds for each concurrent wait.
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub ms: Vec<String>,
}

/// Arguments for the segments command.
#[derive(Args)]
pub struct SegmentsArgs {
    /// Also list the built-in cache-life profiles.
    #[arg(long)]
    pub profiles: bool,
}

/// Arguments for the load command.
#[derive(Args)]
pub struct LoadArgs {
    /// Segment id (see `cachelab segments`).
    pub segment: String,

    /// Locale for `[locale]` segments (default from config).
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Extra route parameter as NAME=VALUE.
    #[arg(short, long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    if name.is_empty() {
        return Err(format!("empty parameter name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,

    /// Write a default configuration file.
    Init {
        /// Where to write it.
        #[arg(default_value = "cachelab.toml")]
        path: String,

        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}
