//! Wait command.

use anyhow::Result;
use cachelab_delay::Waiter;
use serde_json::json;

use super::WaitArgs;
use crate::context::Context;
use crate::output::format_ms;

/// Run the wait command.
pub async fn run(args: WaitArgs, ctx: &Context) -> Result<()> {
    let delay = ctx.parse_delay(&args.ms)?;
    ctx.output.debug(&format!("Waiting {} (from '{}')", delay, args.ms));

    let spinner = if args.quiet {
        indicatif::ProgressBar::hidden()
    } else {
        ctx.output.spinner(&format!("Waiting {}", delay))
    };

    let waiter = Waiter::new(ctx.scheduler.clone());
    let completion = waiter.wait_timed(delay).await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "requested_ms": completion.requested.as_duration().as_secs_f64() * 1000.0,
            "elapsed_ms": completion.elapsed.as_secs_f64() * 1000.0,
            "result": completion.completed,
        }));
    } else {
        ctx.output.success(&format!(
            "{} after {} (requested {})",
            completion.completed,
            format_ms(completion.elapsed),
            completion.requested
        ));
    }

    Ok(())
}
