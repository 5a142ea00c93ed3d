//! cachelab - run artificial delays and load cached demo segments.
//!
//! Commands:
//! - `cachelab wait` - Wait once and report the elapsed time
//! - `cachelab race` - Start several waits at once
//! - `cachelab segments` - List segments and their cache directives
//! - `cachelab load` - Load a segment
//! - `cachelab config` - Show or write configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{ConfigArgs, LoadArgs, RaceArgs, SegmentsArgs, WaitArgs};

/// cachelab - artificial latency and cache directive demo
#[derive(Parser)]
#[command(name = "cachelab")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait a number of milliseconds
    Wait(WaitArgs),

    /// Run several waits concurrently
    Race(RaceArgs),

    /// List segments and their cache directives
    Segments(SegmentsArgs),

    /// Load a segment
    Load(LoadArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), output)?;
    logging::init(&ctx.config.logging, cli.verbose, cli.json);
    tracing::debug!(config = ?ctx.config_path, policy = %ctx.config.delay.policy, "configuration loaded");

    // Execute command
    let result = match cli.command {
        Commands::Wait(args) => commands::wait::run(args, &ctx).await,
        Commands::Race(args) => commands::race::run(args, &ctx).await,
        Commands::Segments(args) => commands::segments::run(args, &ctx).await,
        Commands::Load(args) => commands::load::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
