//! Segment errors.

use cachelab_cache::DirectiveError;

/// Errors that can occur while loading a segment.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// A route parameter the segment needs was not supplied.
    #[error("segment '{segment}' requires parameter '{param}'")]
    MissingParam { segment: String, param: String },

    /// No segment with this id is registered.
    #[error("unknown segment: {0}")]
    UnknownSegment(String),

    /// A declared directive is invalid.
    #[error("invalid cache directive: {0}")]
    InvalidDirective(#[from] DirectiveError),
}
