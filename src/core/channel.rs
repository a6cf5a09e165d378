//! # Single-use handoff of one attempt's outcome.
//!
//! [`result_channel`] creates the slot for one attempt and splits it into an
//! [`OutcomeSender`] (held by the worker) and an [`OutcomeReceiver`] (held by
//! the deadline supervisor).
//!
//! ## Rules
//! - **First delivery wins**: the first accepted [`OutcomeSender::deliver`]
//!   consumes the slot; every later call is a no-op.
//! - **No delivery after cancellation**: once the attempt token is cancelled,
//!   deliveries are discarded, so a late fix never surfaces.
//! - **Sealing**: on the timeout and interrupt paths the supervisor calls
//!   [`OutcomeReceiver::seal`], which closes the slot. A delivery that won the
//!   race before sealing is returned; anything after is discarded.
//!
//! ```text
//! worker:     deliver(o1) ──► Accepted       deliver(o2) ──► AlreadyDelivered
//!                                │
//! supervisor: recv_within(deadline, interrupt) ──► Delivered(o1)
//!
//! worker:     ...still reading...                 deliver(o) ──► Discarded
//! supervisor: recv_within ──► Elapsed ──► cancel ──► seal() ──► None ──► TimeoutFailure
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::position::Outcome;

type Slot = Arc<Mutex<Option<oneshot::Sender<Outcome>>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<oneshot::Sender<Outcome>>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Result of [`OutcomeSender::deliver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The outcome is the one the consumer will see.
    Accepted,
    /// Another outcome already took the slot (or it was sealed).
    AlreadyDelivered,
    /// The attempt was cancelled or the consumer is gone.
    Discarded,
}

/// Result of [`OutcomeReceiver::recv_within`].
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    /// The producer delivered in time.
    Delivered(Outcome),
    /// The timeout elapsed first.
    Elapsed,
    /// The interrupt token fired first.
    Interrupted,
    /// Every producer handle was dropped without delivering.
    Closed,
}

/// Creates the handoff slot for one attempt, bound to its cancellation token.
pub fn result_channel(token: CancellationToken) -> (OutcomeSender, OutcomeReceiver) {
    let (tx, rx) = oneshot::channel();
    let slot: Slot = Arc::new(Mutex::new(Some(tx)));
    (
        OutcomeSender {
            slot: Arc::clone(&slot),
            token,
        },
        OutcomeReceiver {
            rx,
            slot: Arc::downgrade(&slot),
        },
    )
}

/// Producer side of the slot. Cloning shares the same slot.
#[derive(Clone, Debug)]
pub struct OutcomeSender {
    slot: Slot,
    token: CancellationToken,
}

impl OutcomeSender {
    /// Offers `outcome` to the consumer; only the first accepted offer counts.
    pub fn deliver(&self, outcome: Outcome) -> Delivery {
        let mut slot = lock(&self.slot);
        if self.token.is_cancelled() {
            return Delivery::Discarded;
        }
        match slot.take() {
            None => Delivery::AlreadyDelivered,
            Some(tx) => match tx.send(outcome) {
                Ok(()) => Delivery::Accepted,
                Err(_) => Delivery::Discarded,
            },
        }
    }
}

/// Consumer side of the slot.
///
/// Holds the slot weakly: once every [`OutcomeSender`] is dropped without
/// delivering, the receiver observes [`Received::Closed`].
#[derive(Debug)]
pub struct OutcomeReceiver {
    rx: oneshot::Receiver<Outcome>,
    slot: Weak<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

impl OutcomeReceiver {
    /// Waits for the outcome for at most `timeout`, or until `interrupt` fires.
    ///
    /// An already-cancelled `interrupt` wins over an already-delivered outcome.
    /// Call at most once per receiver.
    pub async fn recv_within(
        &mut self,
        timeout: Duration,
        interrupt: &CancellationToken,
    ) -> Received {
        tokio::select! {
            biased;
            _ = interrupt.cancelled() => Received::Interrupted,
            res = tokio::time::timeout(timeout, &mut self.rx) => match res {
                Ok(Ok(outcome)) => Received::Delivered(outcome),
                Ok(Err(_closed)) => Received::Closed,
                Err(_elapsed) => Received::Elapsed,
            },
        }
    }

    /// Closes the slot and returns the outcome that won the race, if any.
    ///
    /// After sealing, [`OutcomeSender::deliver`] reports `AlreadyDelivered`.
    pub fn seal(mut self) -> Option<Outcome> {
        let pending = self.slot.upgrade().and_then(|slot| lock(&slot).take());
        match pending {
            Some(_unused) => None,
            None => self.rx.try_recv().ok(),
        }
    }
}
