//! Error types used by providers, position values and configuration.
//!
//! None of these cross the [`Locator`](crate::Locator) boundary: every failure
//! of an attempt is folded into an [`Outcome`](crate::Outcome) before the caller
//! sees it. The enums here describe the edges around that core:
//!
//! - [`ProviderError`] - what a [`PositionProvider`](crate::PositionProvider) returns;
//! - [`FixError`] - rejected coordinates or accuracy;
//! - [`ConfigError`] - a [`Config`](crate::Config) or [`GpsProfile`](crate::GpsProfile)
//!   that cannot produce a working locator.
//!
//! Each type exposes `as_label` for logs.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by a single provider read.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The receiver could not determine a position.
    #[error("signal unavailable: {reason}")]
    SignalUnavailable {
        /// Human-readable cause reported by the provider.
        reason: String,
    },

    /// The read observed its cancellation token and stopped without a fix.
    #[error("read cancelled")]
    Canceled,
}

impl ProviderError {
    /// Shorthand for [`ProviderError::SignalUnavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ProviderError::SignalUnavailable {
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use fixvisor::ProviderError;
    ///
    /// assert_eq!(ProviderError::Canceled.as_label(), "provider_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ProviderError::SignalUnavailable { .. } => "provider_signal_unavailable",
            ProviderError::Canceled => "provider_canceled",
        }
    }
}

/// # Rejected position values.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FixError {
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude {value} outside [-90, 90]")]
    Latitude {
        /// Offending value.
        value: f64,
    },

    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude {value} outside [-180, 180]")]
    Longitude {
        /// Offending value.
        value: f64,
    },

    /// Accuracy radius negative or not finite.
    #[error("accuracy {value} m must be a finite non-negative radius")]
    Accuracy {
        /// Offending value.
        value: f64,
    },
}

impl FixError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            FixError::Latitude { .. } => "fix_latitude_out_of_range",
            FixError::Longitude { .. } => "fix_longitude_out_of_range",
            FixError::Accuracy { .. } => "fix_accuracy_invalid",
        }
    }
}

/// # Configuration that cannot produce a working locator.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A zero deadline would time out every attempt before it starts.
    #[error("deadline must be greater than zero")]
    ZeroDeadline,

    /// The simulated latency range is empty.
    #[error("latency range {min:?}..={max:?} is inverted")]
    InvertedLatency {
        /// Lower bound.
        min: Duration,
        /// Upper bound.
        max: Duration,
    },

    /// The simulated accuracy range is empty or negative.
    #[error("accuracy range {min}..={max} m is invalid")]
    InvalidAccuracy {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Signal-loss probability outside `[0, 1]`.
    #[error("signal loss probability {value} outside [0, 1]")]
    Probability {
        /// Offending value.
        value: f64,
    },

    /// Scatter offset not finite or outside `[0, 180]` degrees.
    #[error("offset {value} degrees outside [0, 180]")]
    Offset {
        /// Offending value.
        value: f64,
    },

    /// The slowest simulated read would never finish before the deadline.
    #[error("simulated latency up to {latency_max:?} does not fit deadline {deadline:?}")]
    LatencyExceedsDeadline {
        /// Longest simulated read.
        latency_max: Duration,
        /// Configured deadline.
        deadline: Duration,
    },

    /// The base coordinate of the simulated receiver is not a valid fix.
    #[error("invalid base position: {0}")]
    BasePosition(#[from] FixError),
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use fixvisor::ConfigError;
    ///
    /// assert_eq!(ConfigError::ZeroDeadline.as_label(), "config_zero_deadline");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::ZeroDeadline => "config_zero_deadline",
            ConfigError::InvertedLatency { .. } => "config_inverted_latency",
            ConfigError::InvalidAccuracy { .. } => "config_invalid_accuracy",
            ConfigError::Probability { .. } => "config_probability",
            ConfigError::Offset { .. } => "config_offset",
            ConfigError::LatencyExceedsDeadline { .. } => "config_latency_exceeds_deadline",
            ConfigError::BasePosition(_) => "config_base_position",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_renders_reason() {
        let err = ProviderError::unavailable("signal not available");
        assert_eq!(err.to_string(), "signal unavailable: signal not available");
        assert_eq!(err.as_label(), "provider_signal_unavailable");
    }

    #[test]
    fn base_position_wraps_fix_error() {
        let err: ConfigError = FixError::Latitude { value: 91.0 }.into();
        assert_eq!(err.as_label(), "config_base_position");
        assert!(err.to_string().contains("latitude 91"));
    }
}
