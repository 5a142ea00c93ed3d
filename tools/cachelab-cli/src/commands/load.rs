//! Load command: run a segment and explain its cache declaration.

use anyhow::{Context as _, Result};
use cachelab_segments::{SegmentParams, LOCALE_PARAM};
use serde_json::json;

use super::LoadArgs;
use crate::context::Context;

/// Build the parameters handed to `segment`.
fn params_for(segment: &str, args: &LoadArgs, default_locale: &str) -> SegmentParams {
    let mut params = SegmentParams::new();
    if segment.contains("[locale]") || args.locale.is_some() {
        let locale = args.locale.as_deref().unwrap_or(default_locale);
        params = params.with(LOCALE_PARAM, locale);
    }
    for (name, value) in &args.params {
        params = params.with(name.clone(), value.clone());
    }
    params
}

/// Run the load command.
pub async fn run(args: LoadArgs, ctx: &Context) -> Result<()> {
    let registry = ctx.registry();
    let params = params_for(&args.segment, &args, &ctx.config.segments.default_locale);
    ctx.output.debug(&format!("Loading {} with {:?}", args.segment, params));

    let spinner = ctx.output.spinner(&format!("Loading {}", args.segment));
    let result = registry.load(&args.segment, &params).await;
    spinner.finish_and_clear();

    let output = result.with_context(|| {
        format!(
            "Failed to load '{}' (known: {})",
            args.segment,
            registry.ids().join(", ")
        )
    })?;
    let explain = output.explain();
    ctx.output.debug(&explain.to_json());
    let headers = explain.to_headers();

    if ctx.output.is_json() {
        let headers: serde_json::Map<_, _> = headers
            .into_iter()
            .map(|(name, value)| (name, json!(value)))
            .collect();
        ctx.output.json(&json!({ "output": output, "headers": headers }));
        return Ok(());
    }

    ctx.output
        .success(&format!("{} loaded in {}ms", output.segment, output.elapsed_ms));
    if let Some(heading) = &output.heading {
        ctx.output.kv("heading", heading);
    }
    if let Some(body) = &output.body {
        ctx.output.kv("body", body);
    }
    if let Some(fallback) = &output.fallback {
        ctx.output.kv("fallback", fallback);
    }

    ctx.output.header("Cache headers");
    for (name, value) in &headers {
        ctx.output.kv(name, value);
    }

    Ok(())
}
