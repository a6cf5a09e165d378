//! # RetryOrchestrator: bounded retries around the deadline supervisor.
//!
//! Repeats a supervised read until it succeeds, the retry budget is spent, or
//! the caller interrupts.
//!
//! ## State machine
//! ```text
//! Idle ──► Attempting(1) ──► Succeeded                          (Success)
//!               │        ──► Interrupted                        (InterruptedFailure)
//!               │        ──► Exhausted      if i == max         (last failure)
//!               └─ DomainFailure / TimeoutFailure:
//!                    ├─► publish BackoffScheduled
//!                    ├─► sleep(backoff.next(i - 1))  ── interrupt ──► Interrupted
//!                    └─► Attempting(i + 1)
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; attempt `i + 1` starts only after attempt
//!   `i` has settled and its backoff has elapsed.
//! - The provider is invoked at most `max_attempts` times (`0` counts as `1`).
//! - Interruption is never retried and skips any pending backoff.

use std::sync::Arc;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::core::deadline::DeadlineSupervisor;
use crate::events::{Bus, Event, EventKind};
use crate::policies::BackoffPolicy;
use crate::position::{Attempt, Outcome};
use crate::providers::ProviderRef;

/// Drives bounded retries of a [`DeadlineSupervisor`].
#[derive(Clone, Debug)]
pub struct RetryOrchestrator {
    supervisor: DeadlineSupervisor,
    backoff: BackoffPolicy,
    bus: Bus,
}

impl RetryOrchestrator {
    /// Creates an orchestrator publishing to `bus`.
    pub fn new(supervisor: DeadlineSupervisor, backoff: BackoffPolicy, bus: Bus) -> Self {
        Self {
            supervisor,
            backoff,
            bus,
        }
    }

    /// Supervisor used for every attempt.
    pub fn supervisor(&self) -> &DeadlineSupervisor {
        &self.supervisor
    }

    /// Backoff applied between failed attempts.
    pub fn backoff(&self) -> BackoffPolicy {
        self.backoff
    }

    /// Acquires a position with at most `max_attempts` reads.
    ///
    /// ### Exit conditions
    /// - `Success` → returned immediately
    /// - `InterruptedFailure`, or `interrupt` fires during backoff → `InterruptedFailure`
    /// - `max_attempts` retryable failures → the last failure
    pub async fn acquire_with_retry(
        &self,
        provider: &ProviderRef,
        max_attempts: u32,
        interrupt: &CancellationToken,
    ) -> Outcome {
        let max_attempts = max_attempts.max(1);
        let name: Arc<str> = Arc::from(provider.name());
        let mut index: u32 = 0;

        loop {
            index += 1;
            let attempt = Attempt::new(
                index,
                self.supervisor.run(provider, index, interrupt).await,
            );

            if !attempt.outcome.is_retryable() {
                return attempt.into_outcome();
            }
            if attempt.index >= max_attempts {
                self.bus.publish(
                    Event::new(EventKind::RetriesExhausted)
                        .with_provider(Arc::clone(&name))
                        .with_attempt(attempt.index)
                        .with_reason(attempt.outcome.to_string()),
                );
                return attempt.into_outcome();
            }

            let delay = self.backoff.next(attempt.index - 1);
            self.bus.publish(
                Event::new(EventKind::BackoffScheduled)
                    .with_provider(Arc::clone(&name))
                    .with_attempt(attempt.index)
                    .with_delay(delay)
                    .with_reason(attempt.outcome.to_string()),
            );

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                biased;
                _ = interrupt.cancelled() => return Outcome::InterruptedFailure,
                _ = &mut sleep => {}
            }
        }
    }
}
