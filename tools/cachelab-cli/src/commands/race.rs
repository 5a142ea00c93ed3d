//! Race command: concurrent, independent waits.

use anyhow::Result;
use cachelab_delay::{Scheduler, Waiter};
use futures::stream::{FuturesUnordered, StreamExt};
use serde_json::json;

use super::RaceArgs;
use crate::context::Context;
use crate::output::format_ms;

/// Run the race command.
pub async fn run(args: RaceArgs, ctx: &Context) -> Result<()> {
    let delays = args
        .ms
        .iter()
        .map(|ms| ctx.parse_delay(ms))
        .collect::<Result<Vec<_>>>()?;

    let waiter = Waiter::new(ctx.scheduler.clone());
    let started = ctx.scheduler.now();
    let spinner = ctx.output.spinner(&format!("Racing {} waits", delays.len()));

    let mut pending: FuturesUnordered<_> = delays
        .iter()
        .enumerate()
        .map(|(index, delay)| {
            let waiter = &waiter;
            async move { (index, waiter.wait_timed(*delay).await) }
        })
        .collect();

    let mut finished = Vec::with_capacity(delays.len());
    while let Some((index, completion)) = pending.next().await {
        spinner.suspend(|| {
            ctx.output.info(&format!(
                "#{} {} resolved {} after {}",
                index,
                completion.requested,
                completion.completed,
                format_ms(completion.elapsed)
            ))
        });
        finished.push((index, completion));
    }
    spinner.finish_and_clear();

    let total = ctx.scheduler.now().saturating_sub(started);
    let longest = delays.iter().max().copied().unwrap_or_default();

    if ctx.output.is_json() {
        let order: Vec<_> = finished
            .iter()
            .map(|(index, c)| {
                json!({
                    "index": index,
                    "requested_ms": c.requested.as_duration().as_secs_f64() * 1000.0,
                    "elapsed_ms": c.elapsed.as_secs_f64() * 1000.0,
                    "result": c.completed,
                })
            })
            .collect();
        ctx.output.json(&json!({
            "completions": order,
            "total_ms": total.as_secs_f64() * 1000.0,
        }));
    } else {
        ctx.output.success(&format!(
            "{} waits finished in {} (longest requested {})",
            finished.len(),
            format_ms(total),
            longest
        ));
    }

    Ok(())
}
