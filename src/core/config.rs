//! # Locator configuration.
//!
//! [`Config`] centralizes the constants of the acquisition core. All fields are
//! public; [`Config::validate`] rejects values that cannot work.
//!
//! ## Sentinel values
//! - `max_attempts = 0` → treated as 1 (every call makes at least one attempt)
//! - `bus_capacity = 0` → clamped to 1 by the bus

use std::time::Duration;

use crate::error::ConfigError;
use crate::policies::BackoffPolicy;

/// Default per-attempt deadline.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Default grace a cancelled read gets before the worker drops it.
pub const DEFAULT_RELEASE_GRACE: Duration = Duration::from_millis(500);

/// Configuration for a [`Locator`](crate::Locator).
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Hard wall-clock budget of a single read.
    ///
    /// When it elapses the read is cancelled and the attempt ends with
    /// `TimeoutFailure`. Must be greater than zero.
    pub deadline: Duration,

    /// Time a cancelled read gets to stop on its own before it is dropped.
    ///
    /// Never delays the caller; results produced within it are discarded.
    pub release_grace: Duration,

    /// Wait inserted between failed attempts of a retried acquisition.
    pub backoff: BackoffPolicy,

    /// Retry budget used by
    /// [`Locator::acquire_position_with_default_retry`](crate::Locator::acquire_position_with_default_retry).
    pub max_attempts: u32,

    /// Capacity of the event bus ring buffer.
    pub bus_capacity: usize,
}

impl Config {
    /// Checks the configuration for values that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deadline.is_zero() {
            return Err(ConfigError::ZeroDeadline);
        }
        Ok(())
    }

    /// Returns the retry budget clamped to a minimum of 1.
    #[inline]
    pub fn attempts_clamped(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `deadline = 5s`
    /// - `release_grace = 500ms`
    /// - `backoff = fixed 1s`
    /// - `max_attempts = 3`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
            release_grace: DEFAULT_RELEASE_GRACE,
            backoff: BackoffPolicy::default(),
            max_attempts: 3,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.deadline, Duration::from_secs(5));
        assert_eq!(cfg.backoff.next(0), Duration::from_secs(1));
        assert_eq!(cfg.release_grace, Duration::from_millis(500));
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn zero_deadline_is_rejected() {
        let cfg = Config {
            deadline: Duration::ZERO,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroDeadline));
    }

    #[test]
    fn sentinels_are_clamped() {
        let cfg = Config {
            max_attempts: 0,
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.attempts_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
