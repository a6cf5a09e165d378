//! # Terminal result of one acquisition attempt.
//!
//! [`Outcome`] replaces an exception hierarchy with a value: every layer
//! pattern-matches on it, and exactly one is produced per attempt.
//!
//! | Variant              | Meaning                            | Retried? |
//! |----------------------|------------------------------------|----------|
//! | `Success`            | fix acquired                       | -        |
//! | `DomainFailure`      | provider reported no signal        | yes      |
//! | `TimeoutFailure`     | deadline elapsed before completion | yes      |
//! | `InterruptedFailure` | caller/external cancellation       | no       |

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::fix::PositionFix;

/// Single terminal result of an attempt (or of a whole retried acquisition).
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// Provider produced a valid fix in time.
    Success(PositionFix),
    /// Provider completed but could not determine a position.
    DomainFailure {
        /// Cause reported by the provider.
        reason: Arc<str>,
    },
    /// The attempt did not complete within its deadline.
    TimeoutFailure {
        /// Deadline that was exceeded.
        deadline: Duration,
    },
    /// The caller (or an OS signal) cancelled the acquisition.
    InterruptedFailure,
}

impl Outcome {
    /// Shorthand for [`Outcome::DomainFailure`].
    pub fn domain(reason: impl Into<Arc<str>>) -> Self {
        Outcome::DomainFailure {
            reason: reason.into(),
        }
    }

    /// True for [`Outcome::Success`].
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Indicates whether the retry loop may try again after this outcome.
    ///
    /// Returns `true` for [`Outcome::DomainFailure`] and [`Outcome::TimeoutFailure`].
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use fixvisor::Outcome;
    ///
    /// assert!(Outcome::domain("no signal").is_retryable());
    /// assert!(Outcome::TimeoutFailure { deadline: Duration::from_secs(5) }.is_retryable());
    /// assert!(!Outcome::InterruptedFailure.is_retryable());
    /// ```
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Outcome::DomainFailure { .. } | Outcome::TimeoutFailure { .. }
        )
    }

    /// The acquired fix, if any.
    pub fn fix(&self) -> Option<&PositionFix> {
        match self {
            Outcome::Success(fix) => Some(fix),
            _ => None,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::DomainFailure { .. } => "domain_failure",
            Outcome::TimeoutFailure { .. } => "timeout_failure",
            Outcome::InterruptedFailure => "interrupted_failure",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(fix) => write!(f, "position {fix}"),
            Outcome::DomainFailure { reason } => write!(f, "position not detectable: {reason}"),
            Outcome::TimeoutFailure { deadline } => {
                write!(f, "position not received within {deadline:?}")
            }
            Outcome::InterruptedFailure => f.write_str("position request interrupted"),
        }
    }
}

/// One iteration of the retry loop.
///
/// Lives only inside [`RetryOrchestrator`](crate::RetryOrchestrator); the
/// caller receives its outcome, never the attempt itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Attempt {
    /// 1-based position within the acquisition.
    pub index: u32,
    /// Terminal result of this attempt.
    pub outcome: Outcome,
}

impl Attempt {
    /// Records the outcome of attempt `index`.
    pub fn new(index: u32, outcome: Outcome) -> Self {
        Self { index, outcome }
    }

    /// Consumes the attempt, keeping only its outcome.
    pub fn into_outcome(self) -> Outcome {
        self.outcome
    }
}
