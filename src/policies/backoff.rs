//! # Backoff between failed acquisition attempts.
//!
//! [`BackoffPolicy`] yields the wait inserted after attempt `n` fails. The
//! default is a fixed one-second pause; `factor > 1.0` turns it into
//! exponential growth capped at [`BackoffPolicy::max`].
//!
//! The delay after the `n`-th failure (0-indexed) is `first × factor^n`,
//! clamped to `max`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use fixvisor::BackoffPolicy;
//!
//! let fixed = BackoffPolicy::fixed(Duration::from_secs(1));
//! assert_eq!(fixed.next(0), Duration::from_secs(1));
//! assert_eq!(fixed.next(7), Duration::from_secs(1));
//!
//! let growing = BackoffPolicy {
//!     first: Duration::from_millis(250),
//!     max: Duration::from_secs(2),
//!     factor: 2.0,
//! };
//! assert_eq!(growing.next(1), Duration::from_millis(500));
//! assert_eq!(growing.next(10), Duration::from_secs(2));
//! ```

use std::time::Duration;

/// Retry backoff policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay after the first failed attempt.
    pub first: Duration,
    /// Upper bound for any delay.
    pub max: Duration,
    /// Multiplicative growth factor (`1.0` = constant).
    pub factor: f64,
}

impl Default for BackoffPolicy {
    /// Fixed `1s` between attempts.
    fn default() -> Self {
        Self::fixed(Duration::from_secs(1))
    }
}

impl BackoffPolicy {
    /// Same `delay` after every failure.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            first: delay,
            max: delay,
            factor: 1.0,
        }
    }

    /// No wait between attempts.
    pub fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Computes the delay after failure number `failed` (0-indexed).
    ///
    /// Non-finite or negative intermediate values clamp to [`BackoffPolicy::max`].
    pub fn next(&self, failed: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = failed.min(i32::MAX as u32) as i32;
        let secs = self.first.as_secs_f64() * self.factor.powi(exp);

        if !secs.is_finite() || secs < 0.0 || secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_second_fixed() {
        let policy = BackoffPolicy::default();
        for failed in 0..5 {
            assert_eq!(policy.next(failed), Duration::from_secs(1));
        }
    }

    #[test]
    fn none_never_waits() {
        assert_eq!(BackoffPolicy::none().next(3), Duration::ZERO);
    }

    #[test]
    fn exponential_growth_is_capped() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(1),
            factor: 2.0,
        };
        assert_eq!(policy.next(0), Duration::from_millis(100));
        assert_eq!(policy.next(2), Duration::from_millis(400));
        assert_eq!(policy.next(4), Duration::from_secs(1));
    }

    #[test]
    fn first_above_max_is_clamped() {
        let policy = BackoffPolicy {
            first: Duration::from_secs(10),
            max: Duration::from_secs(5),
            factor: 1.0,
        };
        assert_eq!(policy.next(0), Duration::from_secs(5));
    }

    #[test]
    fn overflow_clamps_to_max() {
        let policy = BackoffPolicy {
            first: Duration::from_millis(100),
            max: Duration::from_secs(10),
            factor: 2.0,
        };
        assert_eq!(policy.next(u32::MAX), Duration::from_secs(10));
    }
}
