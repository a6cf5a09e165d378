//! Runtime core: deadline, retry and the locator facade.
//!
//! Internal modules:
//! - [`channel`]: single-use, first-delivery-wins handoff of one attempt's outcome;
//! - [`deadline`]: runs one read on a worker and races it against the deadline;
//! - [`retry`]: sequential attempts with backoff;
//! - [`locator`]: public entry point, owns the bus, subscribers and root token;
//! - [`shutdown`]: cross-platform termination signal handling.

mod builder;
mod channel;
mod config;
mod deadline;
mod locator;
mod retry;
mod shutdown;

pub use builder::LocatorBuilder;
pub use channel::{Delivery, OutcomeReceiver, OutcomeSender, Received, result_channel};
pub use config::{Config, DEFAULT_DEADLINE, DEFAULT_RELEASE_GRACE};
pub use deadline::{DeadlineSupervisor, PROVIDER_VANISHED};
pub use locator::Locator;
pub use retry::RetryOrchestrator;
pub use shutdown::wait_for_shutdown_signal;
