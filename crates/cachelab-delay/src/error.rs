//! Delay conversion errors.

/// Error when a millisecond value cannot become a `Delay`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DelayError {
    #[error("delay must not be negative, got {0}ms")]
    Negative(f64),

    #[error("delay must be a finite number, got {0}")]
    NonFinite(f64),

    #[error("invalid delay '{0}': expected milliseconds")]
    Unparsable(String),
}
