//! # fixvisor
//!
//! **Fixvisor** acquires a geographic position from a slow, unreliable
//! receiver without ever blocking its caller past a fixed deadline.
//!
//! Every read runs on its own worker, races a wall-clock deadline (5 s by
//! default) and ends in exactly one [`Outcome`]. A retry orchestrator repeats
//! failed reads with a fixed backoff (1 s by default), and a root cancellation
//! token lets the host interrupt everything at once.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                ┌──────────────────────────────────────────────┐
//!  caller ─────► │  Locator                                     │
//!                │  - root CancellationToken                    │
//!                │  - Bus (broadcast events)                    │
//!                │  - SubscriberSet (fans out to subscribers)   │
//!                └──────┬───────────────────────────────────────┘
//!                       ▼
//!                ┌──────────────────┐  sequential attempts, backoff between
//!                │ RetryOrchestrator│  failures, stops on Success/Interrupted
//!                └──────┬───────────┘
//!                       ▼
//!                ┌──────────────────┐  one attempt: spawn worker, wait at most
//!                │DeadlineSupervisor│  `deadline`, cancel the worker on expiry
//!                └──────┬───────────┘
//!                       ▼
//!                ┌──────────────────┐  first delivery wins, deliveries after
//!                │  result_channel  │  cancellation are discarded
//!                └──────┬───────────┘
//!                       ▼
//!                worker ──► PositionProvider::acquire(token)
//! ```
//!
//! ### Attempt lifecycle
//! ```text
//! AttemptStarting ──► FixAcquired        (Success)
//!                 ──► AttemptFailed      (DomainFailure)
//!                 ──► DeadlineHit        (TimeoutFailure)     ──► LateResultDiscarded?
//!                 ──► AttemptInterrupted (InterruptedFailure)
//!
//! retried: ... AttemptFailed/DeadlineHit ──► BackoffScheduled ──► AttemptStarting ...
//!                                        └─► RetriesExhausted (budget spent)
//! ```
//!
//! ## Features
//! | Area              | Description                                             | Key types / traits                              |
//! |-------------------|---------------------------------------------------------|-------------------------------------------------|
//! | **Acquisition**   | Bounded single reads and retried reads.                 | [`Locator`], [`LocatorBuilder`]                 |
//! | **Outcomes**      | One tagged result per attempt, no exceptions.           | [`Outcome`], [`PositionFix`]                    |
//! | **Providers**     | Plug in any async receiver.                             | [`PositionProvider`], [`ProviderFn`], [`SimulatedGps`] |
//! | **Policies**      | Delay between failed attempts.                          | [`BackoffPolicy`]                               |
//! | **Subscriber API**| Observe attempt lifecycle events (logging, metrics).    | [`Subscribe`], [`LogWriter`]                    |
//! | **Configuration** | Centralize deadline, backoff and retry budget.          | [`Config`]                                      |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use fixvisor::{Config, GpsProfile, LogWriter, Locator, Outcome, SimulatedGps, Subscribe};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let profile = GpsProfile {
//!         signal_loss: 0.0,
//!         ..GpsProfile::default()
//!     };
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
//!
//!     let locator = Locator::builder(Config::default())
//!         .with_provider(Arc::new(SimulatedGps::seeded(profile, 7)?))
//!         .with_subscribers(subs)
//!         .build()?;
//!
//!     match locator.acquire_position().await {
//!         Outcome::Success(fix) => println!("tourist is at {fix}"),
//!         other => println!("no fix: {other}"),
//!     }
//!     locator.shutdown().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod position;
mod providers;
mod subscribers;

// ---- Public re-exports ----

pub use core::{
    Config, DEFAULT_DEADLINE, DEFAULT_RELEASE_GRACE, DeadlineSupervisor, Delivery, Locator,
    LocatorBuilder, OutcomeReceiver, OutcomeSender, PROVIDER_VANISHED, Received,
    RetryOrchestrator, result_channel, wait_for_shutdown_signal,
};
pub use error::{ConfigError, FixError, ProviderError};
pub use events::{Bus, Event, EventKind};
pub use policies::BackoffPolicy;
pub use position::{Attempt, Outcome, PositionFix};
pub use providers::{
    GpsProfile, PositionProvider, ProviderFn, ProviderRef, SIGNAL_NOT_AVAILABLE, SimulatedGps,
};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
