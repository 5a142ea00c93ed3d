//! Millisecond delays and the rules for converting loose numeric input.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DelayError;

/// Largest delay a host timer accepts (2^31 - 1 milliseconds).
pub const MAX_TIMER_MS: u64 = i32::MAX as u64;

/// A non-negative amount of time to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Delay(Duration);

impl Delay {
    /// No delay; resolves on the next scheduler tick.
    pub const ZERO: Delay = Delay(Duration::ZERO);

    /// Create a delay from whole milliseconds.
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Convert a floating millisecond value, rejecting negative and non-finite input.
    pub fn try_from_millis_f64(ms: f64) -> Result<Self, DelayError> {
        if !ms.is_finite() {
            return Err(DelayError::NonFinite(ms));
        }
        if ms < 0.0 {
            return Err(DelayError::Negative(ms));
        }
        Ok(Self(ceil_to_nanos(ms)))
    }

    /// Convert a floating millisecond value, never failing.
    ///
    /// NaN and negative values become zero and anything above
    /// [`MAX_TIMER_MS`] (including +inf) clamps to it. Fractions are kept to
    /// the nanosecond, rounded up, so the delay is never shorter than asked.
    pub fn coerce_millis_f64(ms: f64) -> Self {
        if ms.is_nan() || ms <= 0.0 {
            return Self::ZERO;
        }
        Self(ceil_to_nanos(ms))
    }

    /// The delay as a `Duration`.
    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// The delay in whole milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.0.as_millis() as u64
    }

    /// Whether this delay resolves on the next tick.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

fn ceil_to_nanos(ms: f64) -> Duration {
    // Below 2^53 ns, so the product is exact enough to round up from.
    let ms = ms.min(MAX_TIMER_MS as f64);
    Duration::from_nanos((ms * 1_000_000.0).ceil() as u64)
}

impl From<Duration> for Delay {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl From<u64> for Delay {
    fn from(ms: u64) -> Self {
        Self::from_millis(ms)
    }
}

impl From<Delay> for Duration {
    fn from(delay: Delay) -> Self {
        delay.0
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.subsec_nanos() % 1_000_000 == 0 {
            write!(f, "{}ms", self.as_millis())
        } else {
            write!(f, "{:.3}ms", self.0.as_secs_f64() * 1000.0)
        }
    }
}

/// How loose numeric input becomes a `Delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationPolicy {
    /// Refuse negative and non-finite values.
    Reject,
    /// Zero out negative and NaN input, clamp the rest.
    #[default]
    Coerce,
}

impl DurationPolicy {
    /// Convert a floating millisecond value under this policy.
    pub fn convert(&self, ms: f64) -> Result<Delay, DelayError> {
        match self {
            Self::Reject => Delay::try_from_millis_f64(ms),
            Self::Coerce => Ok(Delay::coerce_millis_f64(ms)),
        }
    }

    /// Parse a textual millisecond value under this policy.
    pub fn parse(&self, input: &str) -> Result<Delay, DelayError> {
        let ms = input
            .trim()
            .parse::<f64>()
            .map_err(|_| DelayError::Unparsable(input.to_string()))?;
        self.convert(ms)
    }
}

impl fmt::Display for DurationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Coerce => write!(f, "coerce"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis() {
        let delay = Delay::from_millis(1000);
        assert_eq!(delay.as_duration(), Duration::from_secs(1));
        assert_eq!(delay.as_millis(), 1000);
        assert!(!delay.is_zero());
    }

    #[test]
    fn test_strict_accepts_fractional() {
        let delay = Delay::try_from_millis_f64(1500.9).unwrap();
        assert!(delay.as_duration() >= Duration::from_micros(1_500_900));
        assert!(delay.as_duration() < Duration::from_micros(1_500_901));
        assert_eq!(delay.as_millis(), 1500);
    }

    #[test]
    fn test_fraction_never_shortens() {
        for (ms, micros) in [(0.5, 500), (0.25, 250), (1.5, 1_500), (2.75, 2_750)] {
            assert_eq!(
                Delay::try_from_millis_f64(ms).unwrap().as_duration(),
                Duration::from_micros(micros)
            );
        }
        let almost = Delay::try_from_millis_f64(999.999_9).unwrap();
        assert!(almost.as_duration() >= Duration::from_nanos(999_999_900));
    }

    #[test]
    fn test_strict_rejects_negative() {
        assert_eq!(
            Delay::try_from_millis_f64(-1.0),
            Err(DelayError::Negative(-1.0))
        );
    }

    #[test]
    fn test_strict_rejects_non_finite() {
        assert!(matches!(
            Delay::try_from_millis_f64(f64::INFINITY),
            Err(DelayError::NonFinite(_))
        ));
        assert!(matches!(
            Delay::try_from_millis_f64(f64::NAN),
            Err(DelayError::NonFinite(_))
        ));
    }

    #[test]
    fn test_coerce_zeroes_and_clamps() {
        assert_eq!(Delay::coerce_millis_f64(-250.0), Delay::ZERO);
        assert_eq!(Delay::coerce_millis_f64(f64::NAN), Delay::ZERO);
        assert_eq!(Delay::coerce_millis_f64(f64::NEG_INFINITY), Delay::ZERO);
        assert_eq!(
            Delay::coerce_millis_f64(0.25).as_duration(),
            Duration::from_micros(250)
        );
        assert_eq!(
            Delay::coerce_millis_f64(f64::INFINITY).as_millis(),
            MAX_TIMER_MS
        );
        assert_eq!(Delay::coerce_millis_f64(1e15).as_millis(), MAX_TIMER_MS);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            DurationPolicy::Coerce.parse(" 60000 ").unwrap(),
            Delay::from_millis(60000)
        );
        assert_eq!(DurationPolicy::Coerce.parse("-5").unwrap(), Delay::ZERO);
        assert!(DurationPolicy::Reject.parse("-5").is_err());
        assert!(matches!(
            DurationPolicy::Reject.parse("soon"),
            Err(DelayError::Unparsable(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Delay::from_millis(20).to_string(), "20ms");
        assert_eq!(Delay::from(Duration::from_micros(500)).to_string(), "0.500ms");
        assert_eq!(DurationPolicy::Reject.to_string(), "reject");
    }
}
