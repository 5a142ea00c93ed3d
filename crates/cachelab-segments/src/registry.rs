//! Segment registry.

use std::sync::Arc;

use cachelab_delay::{Delay, SharedScheduler};
use tracing::debug;

use crate::error::SegmentError;
use crate::layouts::{FooLayout, NestedLayout};
use crate::pages::{FetchPage, RemotePage};
use crate::segment::{Segment, SegmentOutput, SegmentParams};

/// Segments addressable by exact id.
#[derive(Clone, Default)]
pub struct SegmentRegistry {
    segments: Vec<Arc<dyn Segment>>,
}

impl SegmentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The four demo segments, all simulating `latency` on `scheduler`.
    pub fn demo(scheduler: SharedScheduler, latency: Delay) -> Self {
        Self::new()
            .with(FetchPage::new(scheduler.clone(), latency))
            .with(RemotePage::new(scheduler.clone(), latency))
            .with(NestedLayout::new(scheduler.clone(), latency))
            .with(FooLayout::new(scheduler, latency))
    }

    /// Register a segment. A later segment with the same id replaces the earlier one.
    pub fn with(mut self, segment: impl Segment + 'static) -> Self {
        self.segments.retain(|s| s.id() != segment.id());
        self.segments.push(Arc::new(segment));
        self
    }

    /// Look up a segment by id.
    pub fn get(&self, id: &str) -> Option<&dyn Segment> {
        self.segments
            .iter()
            .find(|s| s.id() == id)
            .map(|s| s.as_ref())
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> Vec<&'static str> {
        self.segments.iter().map(|s| s.id()).collect()
    }

    /// Iterate over registered segments.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Segment> {
        self.segments.iter().map(|s| s.as_ref())
    }

    /// Number of registered segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if no segments are registered.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Validate every directive a segment or its loaders declare.
    pub fn validate(&self) -> Result<(), SegmentError> {
        for segment in self.iter() {
            if let Some(directive) = segment.directive() {
                directive.validate()?;
            }
            for loader in segment.cached_loaders() {
                loader.directive.validate()?;
            }
        }
        Ok(())
    }

    /// Load a segment by id.
    pub async fn load(&self, id: &str, params: &SegmentParams) -> Result<SegmentOutput, SegmentError> {
        let segment = self
            .get(id)
            .ok_or_else(|| SegmentError::UnknownSegment(id.to_string()))?;
        debug!(segment = id, "loading segment");
        segment.load(params).await
    }
}
