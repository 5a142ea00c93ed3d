//! Locale pages.

use async_trait::async_trait;
use cachelab_cache::{CacheDirective, CacheKind};
use cachelab_delay::{Delay, Scheduler, SharedScheduler, Waiter};
use tracing::info;

use crate::data::{fetch_data, fetch_data_loader};
use crate::error::SegmentError;
use crate::segment::{CachedLoader, Segment, SegmentKind, SegmentOutput, SegmentParams, LOCALE_PARAM};

/// Page that is not cached itself but reads through the cached `fetch_data`.
#[derive(Clone)]
pub struct FetchPage {
    waiter: Waiter<SharedScheduler>,
    latency: Delay,
}

impl FetchPage {
    pub const ID: &'static str = "[locale]/fetch";

    pub fn new(scheduler: SharedScheduler, latency: Delay) -> Self {
        Self {
            waiter: Waiter::new(scheduler),
            latency,
        }
    }
}

#[async_trait]
impl Segment for FetchPage {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> SegmentKind {
        SegmentKind::Page
    }

    fn directive(&self) -> Option<CacheDirective> {
        None
    }

    fn cached_loaders(&self) -> Vec<CachedLoader> {
        vec![fetch_data_loader()]
    }

    async fn load(&self, params: &SegmentParams) -> Result<SegmentOutput, SegmentError> {
        let locale = params.require(Self::ID, LOCALE_PARAM)?;
        let started = self.waiter.scheduler().now();

        let data = fetch_data(&self.waiter, self.latency).await;

        let elapsed = self.waiter.scheduler().now().saturating_sub(started);
        info!(segment = Self::ID, locale, elapsed_ms = elapsed.as_millis() as u64, "page loaded");

        Ok(SegmentOutput::new(self, params)
            .with_heading(format!("locale: {}", locale))
            .with_body(data)
            .with_elapsed(elapsed))
    }
}

/// Page cached as a whole in the remote cache.
#[derive(Clone)]
pub struct RemotePage {
    waiter: Waiter<SharedScheduler>,
    latency: Delay,
}

impl RemotePage {
    pub const ID: &'static str = "[locale]/remote";

    pub fn new(scheduler: SharedScheduler, latency: Delay) -> Self {
        Self {
            waiter: Waiter::new(scheduler),
            latency,
        }
    }
}

#[async_trait]
impl Segment for RemotePage {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> SegmentKind {
        SegmentKind::Page
    }

    fn directive(&self) -> Option<CacheDirective> {
        Some(CacheDirective::new(CacheKind::Remote))
    }

    async fn load(&self, params: &SegmentParams) -> Result<SegmentOutput, SegmentError> {
        let locale = params.require(Self::ID, LOCALE_PARAM)?;
        let started = self.waiter.scheduler().now();

        self.waiter.wait(self.latency).await;

        let elapsed = self.waiter.scheduler().now().saturating_sub(started);
        info!(segment = Self::ID, locale, elapsed_ms = elapsed.as_millis() as u64, "page loaded");

        Ok(SegmentOutput::new(self, params)
            .with_heading(format!("locale: {}", locale))
            .with_elapsed(elapsed))
    }
}
