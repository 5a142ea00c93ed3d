//! Cached data loaders.

use std::time::Duration;

use cachelab_cache::{CacheDirective, CacheKind, CacheLife};
use cachelab_delay::{Delay, Scheduler, Waiter};
use tracing::debug;

use crate::segment::CachedLoader;

/// Latency every demo segment simulates unless configured otherwise.
pub const DEFAULT_LATENCY: Delay = Delay::from_millis(1000);

/// Tag attached to everything `fetch_data` returns.
pub const DATA_TAG: &str = "data";

/// Name under which `fetch_data` is reported.
pub const FETCH_DATA: &str = "fetch_data";

/// Directive declared by [`fetch_data`]: default cache, 10s stale,
/// 20s revalidate, tagged `data`.
pub fn fetch_data_directive() -> CacheDirective {
    CacheDirective::new(CacheKind::Default)
        .with_life(
            CacheLife::custom()
                .stale(Duration::from_secs(10))
                .revalidate(Duration::from_secs(20)),
        )
        .with_tag(DATA_TAG)
}

/// `fetch_data` as a declared loader.
pub fn fetch_data_loader() -> CachedLoader {
    CachedLoader {
        name: FETCH_DATA.to_string(),
        directive: fetch_data_directive(),
    }
}

/// Simulate a slow fetch, then return the payload `"data"`.
pub async fn fetch_data<S: Scheduler>(waiter: &Waiter<S>, latency: Delay) -> String {
    debug!(latency_ms = latency.as_millis(), "fetching data");
    waiter.wait(latency).await;
    "data".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_data_directive() {
        let directive = fetch_data_directive();
        assert_eq!(directive.kind, CacheKind::Default);
        assert_eq!(directive.life.stale, Duration::from_secs(10));
        assert_eq!(directive.life.revalidate, Duration::from_secs(20));
        assert_eq!(directive.tags, vec![DATA_TAG.to_string()]);
        assert!(directive.validate().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_data_waits_then_returns() {
        let waiter: Waiter = Waiter::default();
        let start = tokio::time::Instant::now();

        assert_eq!(fetch_data(&waiter, DEFAULT_LATENCY).await, "data");
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }
}
