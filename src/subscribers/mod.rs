//! # Event subscribers.
//!
//! ```text
//! DeadlineSupervisor / RetryOrchestrator ── publish(Event) ──► Bus
//!                                                              │
//!                                          Locator listener ◄──┘
//!                                                   │
//!                                             SubscriberSet
//!                                         ┌─────────┼─────────┐
//!                                         ▼         ▼         ▼
//!                                     LogWriter  Metrics   Custom
//! ```
//!
//! - [`Subscribe`] trait implemented by observers
//! - [`SubscriberSet`] bounded, panic-isolated fan-out
//! - [`LogWriter`] tracing-backed logger

mod log;
mod subscriber;
mod subscriber_set;

pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
