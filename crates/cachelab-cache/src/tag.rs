//! Cache tags used to invalidate groups of cached entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DirectiveError;

/// Longest tag accepted, in characters.
pub const MAX_TAG_LENGTH: usize = 256;

/// Most tags a single directive may carry.
pub const MAX_TAGS: usize = 128;

/// A validated, non-empty cache tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheTag(String);

impl CacheTag {
    /// Validate and wrap a tag.
    pub fn new(tag: impl Into<String>) -> Result<Self, DirectiveError> {
        let tag = tag.into();
        if tag.trim().is_empty() {
            return Err(DirectiveError::EmptyTag);
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(DirectiveError::TagTooLong {
                tag,
                max: MAX_TAG_LENGTH,
            });
        }
        Ok(Self(tag))
    }

    /// Get the tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CacheTag {
    type Error = DirectiveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CacheTag> for String {
    fn from(tag: CacheTag) -> Self {
        tag.0
    }
}

impl fmt::Display for CacheTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a list of raw tags.
pub fn validate_tags<S: AsRef<str>>(tags: &[S]) -> Result<Vec<CacheTag>, DirectiveError> {
    if tags.len() > MAX_TAGS {
        return Err(DirectiveError::TooManyTags {
            count: tags.len(),
            max: MAX_TAGS,
        });
    }
    tags.iter().map(|t| CacheTag::new(t.as_ref())).collect()
}
