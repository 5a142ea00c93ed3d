//! Segment abstraction for pages and layouts.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use cachelab_cache::{CacheDirective, CacheExplainHeaders, CacheKeyBuilder, KeyContext, SegmentKey};
use serde::{Deserialize, Serialize};

use crate::error::SegmentError;

/// Name of the locale route parameter.
pub const LOCALE_PARAM: &str = "locale";

/// Whether a segment is a leaf page or a wrapping layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Page,
    Layout,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "page"),
            Self::Layout => write!(f, "layout"),
        }
    }
}

/// Route parameters handed to a segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentParams(BTreeMap<String, String>);

impl SegmentParams {
    /// Create empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters holding only a locale.
    pub fn locale(locale: impl Into<String>) -> Self {
        Self::new().with(LOCALE_PARAM, locale)
    }

    /// Add a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Get a parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(|s| s.as_str())
    }

    /// Get a parameter the segment cannot do without.
    pub fn require(&self, segment: &str, name: &str) -> Result<&str, SegmentError> {
        self.get(name).ok_or_else(|| SegmentError::MissingParam {
            segment: segment.to_string(),
            param: name.to_string(),
        })
    }

    /// Key context for this segment invocation.
    pub fn key_context(&self, segment: &str) -> KeyContext {
        KeyContext {
            segment: segment.to_string(),
            params: self.0.clone(),
        }
    }
}

/// A data loader declared with its own cache directive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedLoader {
    /// Loader name.
    pub name: String,
    /// What the loader declares.
    pub directive: CacheDirective,
}

/// What a segment produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentOutput {
    /// Segment id.
    pub segment: String,
    /// Page or layout.
    pub kind: SegmentKind,
    /// Heading text, e.g. `locale: en`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    /// Body text, e.g. the fetched data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Text shown while children are still loading (layouts only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    /// Segment-level directive, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directive: Option<CacheDirective>,
    /// Key this invocation would be cached under.
    pub key: SegmentKey,
    /// Time spent loading, in milliseconds.
    pub elapsed_ms: u64,
}

impl SegmentOutput {
    /// Start an output for `segment` invoked with `params`.
    pub fn new(segment: &dyn Segment, params: &SegmentParams) -> Self {
        let directive = segment.directive();
        let builder = match &directive {
            Some(d) => CacheKeyBuilder::for_kind(d.kind),
            None => CacheKeyBuilder::new().segment().all_params(),
        };

        Self {
            segment: segment.id().to_string(),
            kind: segment.kind(),
            heading: None,
            body: None,
            fallback: None,
            key: builder.build(&params.key_context(segment.id())),
            directive,
            elapsed_ms: 0,
        }
    }

    /// Set the heading.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the loading fallback.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Record how long the load took.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = elapsed.as_millis() as u64;
        self
    }

    /// Debug headers for this output.
    pub fn explain(&self) -> CacheExplainHeaders {
        self.directive
            .as_ref()
            .map(CacheExplainHeaders::from_directive)
            .unwrap_or_else(CacheExplainHeaders::uncached)
            .with_key(&self.key)
    }
}

/// A page or layout.
#[async_trait]
pub trait Segment: Send + Sync {
    /// Segment id, e.g. `[locale]/fetch`.
    fn id(&self) -> &'static str;

    /// Page or layout.
    fn kind(&self) -> SegmentKind;

    /// Directive declared for the whole segment.
    fn directive(&self) -> Option<CacheDirective>;

    /// Loaders the segment calls that carry their own directive.
    fn cached_loaders(&self) -> Vec<CachedLoader> {
        Vec::new()
    }

    /// Do the segment's (slow) work.
    async fn load(&self, params: &SegmentParams) -> Result<SegmentOutput, SegmentError>;
}
