//! Cached layouts.
//!
//! A layout does its slow work once, then reports the fallback its
//! children show while they load.

use async_trait::async_trait;
use cachelab_cache::{CacheDirective, CacheKind};
use cachelab_delay::{Delay, SharedScheduler, Waiter};
use tracing::info;

use crate::error::SegmentError;
use crate::segment::{Segment, SegmentKind, SegmentOutput, SegmentParams};

/// Layout whose cached inner layout does the waiting.
#[derive(Clone)]
pub struct NestedLayout {
    waiter: Waiter<SharedScheduler>,
    latency: Delay,
}

impl NestedLayout {
    pub const ID: &'static str = "[locale]/nested";
    pub const FALLBACK: &'static str = "Loading page...";

    pub fn new(scheduler: SharedScheduler, latency: Delay) -> Self {
        Self {
            waiter: Waiter::new(scheduler),
            latency,
        }
    }
}

#[async_trait]
impl Segment for NestedLayout {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> SegmentKind {
        SegmentKind::Layout
    }

    fn directive(&self) -> Option<CacheDirective> {
        Some(CacheDirective::new(CacheKind::Default))
    }

    async fn load(&self, params: &SegmentParams) -> Result<SegmentOutput, SegmentError> {
        let completion = self.waiter.wait_timed(self.latency).await;
        info!(segment = Self::ID, elapsed_ms = completion.elapsed.as_millis() as u64, "layout loaded");

        Ok(SegmentOutput::new(self, params)
            .with_fallback(Self::FALLBACK)
            .with_elapsed(completion.elapsed))
    }
}

/// Layout cached at file level.
#[derive(Clone)]
pub struct FooLayout {
    waiter: Waiter<SharedScheduler>,
    latency: Delay,
}

impl FooLayout {
    pub const ID: &'static str = "foo";
    pub const FALLBACK: &'static str = "Loading 2...";

    pub fn new(scheduler: SharedScheduler, latency: Delay) -> Self {
        Self {
            waiter: Waiter::new(scheduler),
            latency,
        }
    }
}

#[async_trait]
impl Segment for FooLayout {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> SegmentKind {
        SegmentKind::Layout
    }

    fn directive(&self) -> Option<CacheDirective> {
        Some(CacheDirective::new(CacheKind::Default))
    }

    async fn load(&self, params: &SegmentParams) -> Result<SegmentOutput, SegmentError> {
        let completion = self.waiter.wait_timed(self.latency).await;
        info!(segment = Self::ID, elapsed_ms = completion.elapsed.as_millis() as u64, "layout loaded");

        Ok(SegmentOutput::new(self, params)
            .with_fallback(Self::FALLBACK)
            .with_elapsed(completion.elapsed))
    }
}

#[cfg(test)]
mod tests {
    use cachelab_delay::TokioScheduler;

    use super::*;
    use crate::data::DEFAULT_LATENCY;

    #[tokio::test(start_paused = true)]
    async fn test_nested_layout_fallback() {
        let layout = NestedLayout::new(TokioScheduler::shared(), DEFAULT_LATENCY);
        let output = layout.load(&SegmentParams::locale("en")).await.unwrap();

        assert_eq!(output.kind, SegmentKind::Layout);
        assert_eq!(output.fallback.as_deref(), Some("Loading page..."));
        assert!(output.heading.is_none());
        assert!(output.elapsed_ms >= 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_foo_layout_needs_no_params() {
        let layout = FooLayout::new(TokioScheduler::shared(), DEFAULT_LATENCY);
        let output = layout.load(&SegmentParams::new()).await.unwrap();

        assert_eq!(output.fallback.as_deref(), Some("Loading 2..."));
        assert_eq!(
            output.explain().cache_control.as_deref(),
            Some("s-maxage=900, stale-while-revalidate")
        );
    }
}
