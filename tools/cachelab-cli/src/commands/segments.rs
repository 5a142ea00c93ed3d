//! Segments command: list declared cache directives.

use anyhow::Result;
use cachelab_cache::{CacheDirective, CacheProfile};
use cachelab_segments::Segment;
use serde_json::{json, Value};

use super::SegmentsArgs;
use crate::context::Context;

/// Run the segments command.
pub async fn run(args: SegmentsArgs, ctx: &Context) -> Result<()> {
    let registry = ctx.registry();
    registry.validate()?;

    if ctx.output.is_json() {
        let segments: Vec<Value> = registry.iter().map(describe).collect();
        let mut doc = json!({ "segments": segments });
        if args.profiles {
            doc["profiles"] = CacheProfile::ALL
                .iter()
                .map(|p| (p.name().to_string(), json!(p.life())))
                .collect::<serde_json::Map<_, _>>()
                .into();
        }
        ctx.output.json(&doc);
        return Ok(());
    }

    ctx.output.header("Segments");
    for segment in registry.iter() {
        ctx.output.info(&format!("{} ({})", segment.id(), segment.kind()));
        match segment.directive() {
            Some(directive) => print_directive(ctx, &directive),
            None => ctx.output.kv("directive", "(none)"),
        }
        for loader in segment.cached_loaders() {
            ctx.output.list_item(&format!("loader {}", loader.name));
            print_directive(ctx, &loader.directive);
        }
    }

    if args.profiles {
        ctx.output.header("Cache-life profiles");
        for profile in CacheProfile::ALL {
            let life = profile.life();
            ctx.output.kv(
                profile.name(),
                &format!(
                    "stale={}s revalidate={}s expire={}",
                    life.stale.as_secs(),
                    life.revalidate.as_secs(),
                    life.expire
                        .map(|e| format!("{}s", e.as_secs()))
                        .unwrap_or_else(|| "never".to_string())
                ),
            );
        }
    }

    Ok(())
}

fn print_directive(ctx: &Context, directive: &CacheDirective) {
    ctx.output.kv("directive", directive.kind.directive());
    ctx.output.kv("cache-control", &directive.cache_control_header());
    if !directive.tags.is_empty() {
        ctx.output.kv("tags", &directive.tags.join(", "));
    }
}

fn describe(segment: &dyn Segment) -> Value {
    let loaders: Vec<Value> = segment
        .cached_loaders()
        .into_iter()
        .map(|l| {
            json!({
                "name": l.name,
                "cache_control": l.directive.cache_control_header(),
                "directive": l.directive,
            })
        })
        .collect();

    json!({
        "id": segment.id(),
        "kind": segment.kind(),
        "directive": segment.directive(),
        "cache_control": segment.directive().map(|d| d.cache_control_header()),
        "loaders": loaders,
    })
}

#[cfg(test)]
mod tests {
    use cachelab_delay::{Delay, ManualScheduler};
    use cachelab_segments::SegmentRegistry;

    use super::*;

    #[test]
    fn test_describe_fetch_page() {
        let registry = SegmentRegistry::demo(ManualScheduler::new().shared(), Delay::ZERO);
        let value = describe(registry.get("[locale]/fetch").unwrap());

        assert_eq!(value["kind"], "page");
        assert!(value["directive"].is_null());
        assert_eq!(value["loaders"][0]["name"], "fetch_data");
        assert_eq!(
            value["loaders"][0]["cache_control"],
            "s-maxage=20, stale-while-revalidate"
        );
    }

    #[test]
    fn test_describe_remote_page() {
        let registry = SegmentRegistry::demo(ManualScheduler::new().shared(), Delay::ZERO);
        let value = describe(registry.get("[locale]/remote").unwrap());

        assert_eq!(value["directive"]["kind"], "remote");
        assert_eq!(value["loaders"].as_array().unwrap().len(), 0);
    }
}
