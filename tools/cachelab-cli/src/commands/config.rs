//! Config command.

use anyhow::{bail, Result};

use super::{ConfigAction, ConfigArgs};
use crate::config::CliConfig;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.action {
        ConfigAction::Show => show(ctx),
        ConfigAction::Init { path, force } => init(ctx, &path, force),
    }
}

fn show(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.info(&format!("Using {}", path.display())),
        None => ctx.output.info("No config file found; using defaults"),
    }
    println!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}

fn init(ctx: &Context, path: &str, force: bool) -> Result<()> {
    let target = ctx.cwd.join(path);
    if target.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", target.display());
    }

    CliConfig::default().save(&target)?;
    ctx.output.success(&format!("Wrote {}", target.display()));
    Ok(())
}
