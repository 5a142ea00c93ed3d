//! Segment cache key composition.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::policy::CacheKind;

/// A key identifying one cached invocation of a segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentKey {
    /// The computed key string.
    key: String,
    /// Components that make up the key (for debugging).
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    components: Vec<String>,
}

impl SegmentKey {
    /// Create a key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            components: Vec::new(),
        }
    }

    /// Get the key string.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Get the key components (for debugging).
    pub fn components(&self) -> &[String] {
        &self.components
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// What a key is built from.
#[derive(Debug, Clone, Default)]
pub struct KeyContext {
    /// Segment id, e.g. `[locale]/fetch`.
    pub segment: String,
    /// Route parameters passed to the segment.
    pub params: BTreeMap<String, String>,
}

impl KeyContext {
    /// Create a context for a segment.
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// Component of a segment key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyComponent {
    /// The segment id.
    Segment,
    /// The cache kind, partitioning remote from local entries.
    Kind(CacheKind),
    /// Specific parameters.
    Params(Vec<String>),
    /// Every parameter, in name order.
    AllParams,
    /// Custom static value.
    Custom(String),
}

/// Builder for composing segment keys.
#[derive(Debug, Clone, Default)]
pub struct CacheKeyBuilder {
    components: Vec<KeyComponent>,
    prefix: Option<String>,
}

impl CacheKeyBuilder {
    /// Create a new key builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual key: kind, segment and every parameter.
    pub fn for_kind(kind: CacheKind) -> Self {
        Self::new().kind(kind).segment().all_params()
    }

    /// Set a prefix for the key.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Include the segment id.
    pub fn segment(mut self) -> Self {
        self.components.push(KeyComponent::Segment);
        self
    }

    /// Include the cache kind.
    pub fn kind(mut self, kind: CacheKind) -> Self {
        self.components.push(KeyComponent::Kind(kind));
        self
    }

    /// Include specific parameters.
    pub fn params(mut self, names: &[&str]) -> Self {
        self.components.push(KeyComponent::Params(
            names.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Include every parameter.
    pub fn all_params(mut self) -> Self {
        self.components.push(KeyComponent::AllParams);
        self
    }

    /// Include a custom static value.
    pub fn custom(mut self, value: impl Into<String>) -> Self {
        self.components.push(KeyComponent::Custom(value.into()));
        self
    }

    /// Build the key from context.
    pub fn build(&self, ctx: &KeyContext) -> SegmentKey {
        let mut parts = Vec::new();
        let mut component_descs = Vec::new();

        if let Some(prefix) = &self.prefix {
            parts.push(prefix.clone());
        }

        for component in &self.components {
            match component {
                KeyComponent::Segment => {
                    parts.push(ctx.segment.clone());
                    component_descs.push(format!("segment:{}", ctx.segment));
                }
                KeyComponent::Kind(kind) => {
                    parts.push(format!("k:{:?}", kind));
                    component_descs.push(format!("kind:{}", kind));
                }
                KeyComponent::Params(names) => {
                    for name in names {
                        if let Some(value) = ctx.params.get(name) {
                            parts.push(format!("{}={}", name, value));
                            component_descs.push(format!("param:{}={}", name, value));
                        }
                    }
                }
                KeyComponent::AllParams => {
                    for (k, v) in &ctx.params {
                        parts.push(format!("{}={}", k, v));
                        component_descs.push(format!("param:{}={}", k, v));
                    }
                }
                KeyComponent::Custom(value) => {
                    parts.push(value.clone());
                    component_descs.push(format!("custom:{}", value));
                }
            }
        }

        // Join with a separator and hash for consistent length
        let key_string = parts.join("|");
        let key = format!("{:016x}", simple_hash(&key_string));

        SegmentKey {
            key,
            components: component_descs,
        }
    }
}

// Non-cryptographic; stable within one build.
fn simple_hash(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_inputs_same_key() {
        let builder = CacheKeyBuilder::for_kind(CacheKind::Default);
        let a = builder.build(&KeyContext::new("[locale]/fetch").with_param("locale", "en"));
        let b = builder.build(&KeyContext::new("[locale]/fetch").with_param("locale", "en"));

        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 16);
    }

    #[test]
    fn test_params_change_key() {
        let builder = CacheKeyBuilder::for_kind(CacheKind::Default);
        let en = builder.build(&KeyContext::new("[locale]/fetch").with_param("locale", "en"));
        let fr = builder.build(&KeyContext::new("[locale]/fetch").with_param("locale", "fr"));

        assert_ne!(en, fr);
    }

    #[test]
    fn test_kind_partitions_key() {
        let ctx = KeyContext::new("[locale]/remote").with_param("locale", "en");
        let local = CacheKeyBuilder::for_kind(CacheKind::Default).build(&ctx);
        let remote = CacheKeyBuilder::for_kind(CacheKind::Remote).build(&ctx);

        assert_ne!(local, remote);
    }

    #[test]
    fn test_components_recorded() {
        let key = CacheKeyBuilder::new()
            .with_prefix("v1")
            .segment()
            .params(&["locale", "missing"])
            .custom("layout")
            .build(&KeyContext::new("foo").with_param("locale", "de"));

        assert_eq!(
            key.components(),
            &["segment:foo", "param:locale=de", "custom:layout"]
        );
    }

    #[test]
    fn test_key_display() {
        let key = SegmentKey::new("abc");
        assert_eq!(key.to_string(), "abc");
        assert!(key.components().is_empty());
    }
}
