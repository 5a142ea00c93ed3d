//! Debug headers describing a segment's cache directive.

use serde::{Deserialize, Serialize};

use crate::key::SegmentKey;
use crate::policy::CacheDirective;

/// Header names for cache debugging.
pub mod header_names {
    /// Standard Cache-Control header.
    pub const CACHE_CONTROL: &str = "Cache-Control";
    /// Cache kind (`use cache`, `use cache: remote`, ...).
    pub const X_CACHE_KIND: &str = "X-Cache-Kind";
    /// Cache tags for invalidation.
    pub const X_CACHE_TAGS: &str = "X-Cache-Tags";
    /// Client stale window in seconds.
    pub const X_CACHE_STALE_TIME: &str = "X-Cache-Stale-Time";
    /// Segment key.
    pub const X_CACHE_KEY: &str = "X-Cache-Key";
}

/// Cache explain headers for debugging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheExplainHeaders {
    /// Cache-Control value.
    pub cache_control: Option<String>,
    /// Directive text.
    pub kind: Option<String>,
    /// Cache tags.
    pub tags: Vec<String>,
    /// Client stale window in seconds.
    pub stale_secs: Option<u64>,
    /// Segment key used.
    pub key: Option<String>,
}

impl CacheExplainHeaders {
    /// Explain a directive.
    pub fn from_directive(directive: &CacheDirective) -> Self {
        Self {
            cache_control: Some(directive.cache_control_header()),
            kind: Some(directive.kind.directive().to_string()),
            tags: directive.tags.clone(),
            stale_secs: Some(directive.life.stale.as_secs()),
            key: None,
        }
    }

    /// Explain a segment that declares no directive.
    pub fn uncached() -> Self {
        Self {
            cache_control: Some("no-store".to_string()),
            ..Self::default()
        }
    }

    /// Set the segment key.
    pub fn with_key(mut self, key: &SegmentKey) -> Self {
        self.key = Some(key.as_str().to_string());
        self
    }

    /// Convert to HTTP header pairs.
    pub fn to_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();

        if let Some(cc) = &self.cache_control {
            headers.push((header_names::CACHE_CONTROL.to_string(), cc.clone()));
        }

        if let Some(kind) = &self.kind {
            headers.push((header_names::X_CACHE_KIND.to_string(), kind.clone()));
        }

        if !self.tags.is_empty() {
            headers.push((header_names::X_CACHE_TAGS.to_string(), self.tags.join(",")));
        }

        if let Some(stale) = self.stale_secs {
            headers.push((header_names::X_CACHE_STALE_TIME.to_string(), stale.to_string()));
        }

        if let Some(key) = &self.key {
            headers.push((header_names::X_CACHE_KEY.to_string(), key.clone()));
        }

        headers
    }

    /// Convert to JSON for debugging output.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
