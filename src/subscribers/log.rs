//! # Tracing-backed logging subscriber.
//!
//! [`LogWriter`] renders every runtime event as a `tracing` event with
//! structured fields. Install any `tracing` subscriber (e.g. `tracing-subscriber`'s
//! `fmt`) to see the output.
//!
//! ## Output (fmt layer)
//! ```text
//! INFO  fixvisor: attempt starting provider=simulated-gps attempt=1 deadline_ms=5000
//! WARN  fixvisor: deadline hit provider=simulated-gps attempt=1 deadline_ms=5000
//! INFO  fixvisor: backoff scheduled provider=simulated-gps attempt=1 delay_ms=1000 reason="..."
//! INFO  fixvisor: fix acquired provider=simulated-gps attempt=2 reason="(40.71..., -74.00...) ±8.1m"
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Logs events through `tracing` under the `fixvisor` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let provider = e.provider.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");
        let attempt = e.attempt.unwrap_or(0);

        match e.kind {
            EventKind::AttemptStarting => {
                info!(target: "fixvisor", provider, attempt, deadline_ms = e.deadline_ms, "attempt starting");
            }
            EventKind::FixAcquired => {
                info!(target: "fixvisor", provider, attempt, reason, "fix acquired");
            }
            EventKind::AttemptFailed => {
                warn!(target: "fixvisor", provider, attempt, reason, "attempt failed");
            }
            EventKind::DeadlineHit => {
                warn!(target: "fixvisor", provider, attempt, deadline_ms = e.deadline_ms, "deadline hit");
            }
            EventKind::AttemptInterrupted => {
                info!(target: "fixvisor", provider, attempt, "attempt interrupted");
            }
            EventKind::LateResultDiscarded => {
                debug!(target: "fixvisor", provider, attempt, reason, "late result discarded");
            }
            EventKind::BackoffScheduled => {
                info!(target: "fixvisor", provider, attempt, delay_ms = e.delay_ms, reason, "backoff scheduled");
            }
            EventKind::RetriesExhausted => {
                warn!(target: "fixvisor", provider, attempts = attempt, reason, "retries exhausted");
            }
            EventKind::InterruptRequested => {
                info!(target: "fixvisor", "interrupt requested");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "fixvisor", subscriber = provider, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                warn!(target: "fixvisor", subscriber = provider, reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
