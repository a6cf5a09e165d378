//! # Runtime events emitted while acquiring a position.
//!
//! The [`EventKind`] enum classifies events into:
//! - **Attempt events**: one read's lifecycle (starting, acquired, failed, deadline, interrupted)
//! - **Retry events**: backoff between attempts and final exhaustion
//! - **Subscriber events**: overflow/panic inside the fan-out
//!
//! The [`Event`] struct carries metadata such as provider name, attempt index,
//! deadline, delay, and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use fixvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::AttemptFailed)
//!     .with_provider("gps")
//!     .with_reason("signal not available")
//!     .with_attempt(2)
//!     .with_deadline(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::AttemptFailed);
//! assert_eq!(ev.provider.as_deref(), Some("gps"));
//! assert_eq!(ev.deadline_ms, Some(5_000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `provider`: subscriber name
    /// - `reason`: panic message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `provider`: subscriber name
    /// - `reason`: `"full"` or `"closed"`
    SubscriberOverflow,

    // === Attempt events ===
    /// A read is about to start on its worker.
    ///
    /// Sets:
    /// - `provider`: provider name
    /// - `attempt`: 1-based attempt index
    /// - `deadline_ms`: deadline for this read
    AttemptStarting,

    /// The read delivered a fix in time.
    ///
    /// Sets:
    /// - `provider`, `attempt`
    /// - `reason`: rendered fix
    FixAcquired,

    /// The read completed without a fix.
    ///
    /// Sets:
    /// - `provider`, `attempt`
    /// - `reason`: provider's failure reason
    AttemptFailed,

    /// The deadline elapsed before the read completed; the worker was cancelled.
    ///
    /// Sets:
    /// - `provider`, `attempt`
    /// - `deadline_ms`: deadline that was exceeded
    DeadlineHit,

    /// The caller cancelled the read.
    ///
    /// Sets:
    /// - `provider`, `attempt`
    AttemptInterrupted,

    /// A result arrived after the attempt was already settled and was dropped.
    ///
    /// Sets:
    /// - `provider`, `attempt`
    /// - `reason`: label of the dropped outcome
    LateResultDiscarded,

    // === Retry events ===
    /// Next attempt scheduled after a retryable failure.
    ///
    /// Sets:
    /// - `provider`
    /// - `attempt`: the attempt that just failed
    /// - `delay_ms`: wait before the next attempt
    /// - `reason`: failure message
    BackoffScheduled,

    /// Every attempt failed; the last failure is returned to the caller.
    ///
    /// Sets:
    /// - `provider`
    /// - `attempt`: number of attempts made
    /// - `reason`: last failure message
    RetriesExhausted,

    // === Locator events ===
    /// All in-flight acquisitions were asked to stop (explicit call or OS signal).
    InterruptRequested,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Attempt deadline in milliseconds (compact).
    pub deadline_ms: Option<u32>,
    /// Backoff delay before next attempt in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (failure, fix, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Attempt index (starting from 1).
    pub attempt: Option<u32>,
    /// Name of the provider (or subscriber), if applicable.
    pub provider: Option<Arc<str>>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            attempt: None,
            deadline_ms: None,
            reason: None,
            delay_ms: None,
            provider: None,
        }
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a provider name.
    #[inline]
    pub fn with_provider(mut self, provider: impl Into<Arc<str>>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Attaches a deadline (stored as milliseconds).
    #[inline]
    pub fn with_deadline(mut self, d: Duration) -> Self {
        self.deadline_ms = Some(compact_ms(d));
        self
    }

    /// Attaches a backoff delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay_ms = Some(compact_ms(d));
        self
    }

    /// Attaches an attempt index.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_provider(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_provider(subscriber)
            .with_reason(info)
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_increase() {
        let a = Event::new(EventKind::AttemptStarting);
        let b = Event::new(EventKind::AttemptStarting);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn durations_saturate_at_u32_millis() {
        let ev = Event::new(EventKind::BackoffScheduled).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));
    }

    #[test]
    fn overflow_event_names_subscriber() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.provider.as_deref(), Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));
    }
}
