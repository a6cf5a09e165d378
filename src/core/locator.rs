//! # Locator: the public face of position acquisition.
//!
//! The [`Locator`] owns the provider, the event bus, the subscriber fan-out and
//! the root cancellation token. Presentation code calls one of two operations
//! and renders the returned [`Outcome`]:
//!
//! - [`Locator::acquire_position`] one read bounded by [`Config::deadline`]
//! - [`Locator::acquire_position_with_retry`] bounded retries with [`Config::backoff`]
//!
//! ## Architecture
//! ```text
//! caller ──► Locator ──► RetryOrchestrator ──► DeadlineSupervisor ──► worker(provider)
//!              │                 │                      │                   │
//!              │                 └──── publish(Event) ──┴───────────────────┘
//!              │                               ▼
//!              │                              Bus ──► listener ──► SubscriberSet
//!              │
//! cancellation: root token ──► call token ──► attempt token   (top-down only)
//! ```
//!
//! ## Concurrency
//! Calls are independent: each derives its own child of the root token and
//! its own per-attempt workers, so concurrent callers share no mutable state.
//! [`Locator::interrupt`] cancels the root token, ending every in-flight call
//! with `InterruptedFailure`; calls made afterwards are interrupted at once.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use fixvisor::{Config, Locator, Outcome, PositionFix, ProviderError, ProviderFn};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ProviderFn::arc("fixed", |_ctx: CancellationToken| async {
//!         PositionFix::new(41.9028, 12.4964, 6.0).map_err(|e| ProviderError::unavailable(e.to_string()))
//!     });
//!
//!     let locator = Locator::builder(Config::default())
//!         .with_provider(provider)
//!         .build()?;
//!
//!     match locator.acquire_position_with_retry(3).await {
//!         Outcome::Success(fix) => println!("tourist is at {fix}"),
//!         other => println!("{other}"),
//!     }
//!     locator.shutdown().await;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::{builder::LocatorBuilder, config::Config, retry::RetryOrchestrator, shutdown};
use crate::events::{Bus, Event, EventKind};
use crate::position::Outcome;
use crate::providers::ProviderRef;
use crate::subscribers::SubscriberSet;

/// Entry point for acquiring positions.
pub struct Locator {
    cfg: Config,
    provider: ProviderRef,
    bus: Bus,
    orchestrator: RetryOrchestrator,
    root: CancellationToken,
    listener_stop: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl Locator {
    /// Starts building a locator from `cfg`.
    pub fn builder(cfg: Config) -> LocatorBuilder {
        LocatorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        provider: ProviderRef,
        bus: Bus,
        orchestrator: RetryOrchestrator,
        subs: SubscriberSet,
    ) -> Self {
        let listener_stop = CancellationToken::new();
        let listener = subscriber_listener(bus.subscribe(), subs, listener_stop.clone());
        Self {
            cfg,
            provider,
            bus,
            orchestrator,
            root: CancellationToken::new(),
            listener_stop,
            listener: Mutex::new(Some(listener)),
        }
    }

    /// Configuration this locator was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Name of the underlying provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Creates a receiver for runtime events published after this call.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Single bounded read: returns within [`Config::deadline`] plus scheduling overhead.
    pub async fn acquire_position(&self) -> Outcome {
        self.acquire_position_until(&CancellationToken::new()).await
    }

    /// Like [`acquire_position`](Self::acquire_position), also ending with
    /// `InterruptedFailure` when `cancel` fires.
    pub async fn acquire_position_until(&self, cancel: &CancellationToken) -> Outcome {
        let call = self.root.child_token();
        let read = self
            .orchestrator
            .supervisor()
            .run(&self.provider, 1, &call);
        linked(read, &call, cancel).await
    }

    /// Up to `max_attempts` reads separated by [`Config::backoff`].
    ///
    /// Returns the first success, the first interruption, or the last failure.
    pub async fn acquire_position_with_retry(&self, max_attempts: u32) -> Outcome {
        self.acquire_position_with_retry_until(max_attempts, &CancellationToken::new())
            .await
    }

    /// [`acquire_position_with_retry`](Self::acquire_position_with_retry) using
    /// [`Config::max_attempts`].
    pub async fn acquire_position_with_default_retry(&self) -> Outcome {
        self.acquire_position_with_retry(self.cfg.attempts_clamped())
            .await
    }

    /// Like [`acquire_position_with_retry`](Self::acquire_position_with_retry),
    /// also ending with `InterruptedFailure` when `cancel` fires.
    pub async fn acquire_position_with_retry_until(
        &self,
        max_attempts: u32,
        cancel: &CancellationToken,
    ) -> Outcome {
        let call = self.root.child_token();
        let read = self
            .orchestrator
            .acquire_with_retry(&self.provider, max_attempts, &call);
        linked(read, &call, cancel).await
    }

    /// Interrupts every in-flight and future acquisition.
    pub fn interrupt(&self) {
        if !self.root.is_cancelled() {
            self.bus.publish(Event::new(EventKind::InterruptRequested));
        }
        self.root.cancel();
    }

    /// True once [`interrupt`](Self::interrupt) has been called.
    pub fn is_interrupted(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Interrupts all acquisitions when the process receives SIGINT/SIGTERM/SIGQUIT (Ctrl-C elsewhere).
    pub fn interrupt_on_signal(self: &Arc<Self>) -> JoinHandle<std::io::Result<()>> {
        let locator = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                res = shutdown::wait_for_shutdown_signal() => {
                    res?;
                    locator.interrupt();
                }
                _ = locator.listener_stop.cancelled() => {}
            }
            Ok::<(), std::io::Error>(())
        })
    }

    /// Stops event delivery and waits for subscribers to drain their queues.
    ///
    /// Acquisitions keep working afterwards; their events are no longer observed.
    pub async fn shutdown(&self) {
        self.listener_stop.cancel();
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

/// Runs `read` under `call`, cancelling `call` when the caller's `cancel` fires.
///
/// The read keeps running after the forward so it can settle with
/// `InterruptedFailure` and publish its terminal event.
async fn linked<F>(read: F, call: &CancellationToken, cancel: &CancellationToken) -> Outcome
where
    F: std::future::Future<Output = Outcome>,
{
    tokio::pin!(read);
    tokio::select! {
        biased;
        out = &mut read => out,
        _ = cancel.cancelled() => {
            call.cancel();
            read.await
        }
    }
}

/// Forwards bus events to the subscriber set until `stop` fires, then drains.
fn subscriber_listener(
    mut rx: broadcast::Receiver<Event>,
    set: SubscriberSet,
    stop: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
                _ = stop.cancelled() => {
                    while let Ok(ev) = rx.try_recv() {
                        set.emit(&ev);
                    }
                    break;
                }
            }
        }
        set.shutdown().await;
    })
}
