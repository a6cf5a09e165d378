//! # Deadline supervisor: one bounded read.
//!
//! [`DeadlineSupervisor::run`] executes **one** attempt of a
//! [`PositionProvider`](crate::PositionProvider) on a dedicated worker and
//! races it against a fixed deadline.
//!
//! ## Flow
//! ```text
//! run(provider, attempt, interrupt)
//!   ├─► attempt token = interrupt.child_token()   (cancelled on drop)
//!   ├─► result_channel(attempt token)
//!   ├─► publish AttemptStarting
//!   ├─► spawn worker: provider.acquire(token) ──► deliver(outcome)
//!   └─► recv_within(deadline, interrupt)
//!         ├─ Delivered(o)  → o                       (FixAcquired / AttemptFailed)
//!         ├─ Elapsed       → cancel, seal → TimeoutFailure       (DeadlineHit)
//!         ├─ Interrupted   → cancel       → InterruptedFailure   (AttemptInterrupted)
//!         └─ Closed        → DomainFailure("provider exited without a result")
//! ```
//!
//! ## Rules
//! - Publishes **exactly one** terminal event per attempt.
//! - Never waits for worker teardown: on expiry the caller gets `TimeoutFailure`
//!   as soon as the timer fires.
//! - The worker is released on every path. It watches its token and gives the
//!   provider [`DeadlineSupervisor::release_grace`] to honour cancellation
//!   before dropping the read; anything it produces after cancellation is
//!   discarded by the channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::core::channel::{Delivery, OutcomeSender, Received, result_channel};
use crate::core::config::DEFAULT_RELEASE_GRACE;
use crate::error::ProviderError;
use crate::events::{Bus, Event, EventKind};
use crate::position::Outcome;
use crate::providers::ProviderRef;

/// Reason used when a worker ends without delivering (e.g. the provider panicked).
pub const PROVIDER_VANISHED: &str = "provider exited without a result";

/// Runs single reads under a hard deadline.
#[derive(Clone, Debug)]
pub struct DeadlineSupervisor {
    deadline: Duration,
    release_grace: Duration,
    bus: Bus,
}

impl DeadlineSupervisor {
    /// Creates a supervisor publishing to `bus`.
    pub fn new(deadline: Duration, bus: Bus) -> Self {
        Self {
            deadline,
            release_grace: DEFAULT_RELEASE_GRACE,
            bus,
        }
    }

    /// Overrides how long a cancelled worker waits for its provider to stop.
    pub fn with_release_grace(mut self, grace: Duration) -> Self {
        self.release_grace = grace;
        self
    }

    /// Deadline applied to every read.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Grace a cancelled worker gives its provider.
    pub fn release_grace(&self) -> Duration {
        self.release_grace
    }

    /// Executes attempt number `attempt` and returns its outcome.
    ///
    /// Returns within `deadline` plus scheduling overhead, whatever the
    /// provider does. Cancelling `interrupt` ends the attempt with
    /// [`Outcome::InterruptedFailure`] and cancels the worker.
    ///
    /// A result the worker delivers after the timer fires but before the
    /// attempt is cancelled still counts, so `Success` can beat the deadline
    /// by that narrow margin instead of `TimeoutFailure`.
    pub async fn run(
        &self,
        provider: &ProviderRef,
        attempt: u32,
        interrupt: &CancellationToken,
    ) -> Outcome {
        let name: Arc<str> = Arc::from(provider.name());
        let token = interrupt.child_token();
        let _release = token.clone().drop_guard();
        let (tx, mut rx) = result_channel(token.clone());

        self.bus.publish(
            Event::new(EventKind::AttemptStarting)
                .with_provider(Arc::clone(&name))
                .with_attempt(attempt)
                .with_deadline(self.deadline),
        );
        self.spawn_worker(Arc::clone(provider), tx, token.clone(), &name, attempt);

        let outcome = match rx.recv_within(self.deadline, interrupt).await {
            Received::Delivered(outcome) => outcome,
            Received::Closed => Outcome::domain(PROVIDER_VANISHED),
            Received::Elapsed => {
                token.cancel();
                rx.seal().unwrap_or(Outcome::TimeoutFailure {
                    deadline: self.deadline,
                })
            }
            Received::Interrupted => {
                token.cancel();
                Outcome::InterruptedFailure
            }
        };

        self.publish_settled(&name, attempt, &outcome);
        outcome
    }

    /// Spawns the per-attempt worker. It owns the only producer handle.
    fn spawn_worker(
        &self,
        provider: ProviderRef,
        tx: OutcomeSender,
        token: CancellationToken,
        name: &Arc<str>,
        attempt: u32,
    ) {
        let grace = self.release_grace;
        let bus = self.bus.clone();
        let name = Arc::clone(name);

        tokio::spawn(async move {
            let read = provider.acquire(token.clone());
            let released = async {
                token.cancelled().await;
                time::sleep(grace).await;
            };

            let outcome = tokio::select! {
                res = read => match res {
                    Ok(fix) => Outcome::Success(fix),
                    Err(ProviderError::SignalUnavailable { reason }) => Outcome::domain(reason),
                    Err(ProviderError::Canceled) => return,
                },
                _ = released => return,
            };

            let label = outcome.as_label();
            if tx.deliver(outcome) != Delivery::Accepted {
                bus.publish(
                    Event::new(EventKind::LateResultDiscarded)
                        .with_provider(name)
                        .with_attempt(attempt)
                        .with_reason(label),
                );
            }
        });
    }

    /// Publishes the single terminal event for this attempt.
    fn publish_settled(&self, name: &Arc<str>, attempt: u32, outcome: &Outcome) {
        let ev = match outcome {
            Outcome::Success(fix) => Event::new(EventKind::FixAcquired).with_reason(fix.to_string()),
            Outcome::DomainFailure { reason } => {
                Event::new(EventKind::AttemptFailed).with_reason(Arc::clone(reason))
            }
            Outcome::TimeoutFailure { deadline } => {
                Event::new(EventKind::DeadlineHit).with_deadline(*deadline)
            }
            Outcome::InterruptedFailure => Event::new(EventKind::AttemptInterrupted),
        };
        self.bus
            .publish(ev.with_provider(Arc::clone(name)).with_attempt(attempt));
    }
}
