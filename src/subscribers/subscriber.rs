//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for observing acquisitions (logging,
//! metrics, audit). Each subscriber gets a dedicated worker task and a bounded
//! queue, so a slow subscriber never delays a read or its deadline.
//!
//! ```text
//! SubscriberSet ──► [bounded queue] ──► worker task ──► subscriber.on_event()
//!                                    └─► panic caught → EventKind::SubscriberPanicked
//! ```
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use fixvisor::{Event, EventKind, Subscribe};
//!
//! struct Misses;
//!
//! #[async_trait]
//! impl Subscribe for Misses {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::DeadlineHit) {
//!             // bump a counter, page someone, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "misses" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for runtime observability.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event, in FIFO order per subscriber.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name used in overflow/panic events.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity (clamped to at least 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
