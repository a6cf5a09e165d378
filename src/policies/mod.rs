//! Retry policies.
//!
//! - [`BackoffPolicy`] how long to wait between failed attempts
//!   (default: fixed 1s).
//!
//! The retry budget itself (`max_attempts`) is a call argument, not a policy:
//! see [`RetryOrchestrator::acquire_with_retry`](crate::RetryOrchestrator::acquire_with_retry).

mod backoff;

pub use backoff::BackoffPolicy;
