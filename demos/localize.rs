//! # Example: localize
//!
//! Locates a tourist with the simulated receiver: one bounded read, then a
//! retried acquisition. Every attempt is logged through [`LogWriter`].
//!
//! Press Ctrl-C to interrupt a running acquisition.
//!
//! ## Flow
//! ```text
//! acquire_position()
//!   ├─► AttemptStarting(attempt=1, deadline=5s)
//!   └─► FixAcquired | AttemptFailed | DeadlineHit
//!
//! acquire_position_with_retry(3)
//!   ├─► attempt 1 ──► AttemptFailed("signal not available")
//!   ├─► BackoffScheduled(delay=1s)
//!   └─► attempt 2 ──► FixAcquired
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=fixvisor=debug cargo run --example localize
//! ```

use std::sync::Arc;

use fixvisor::{Config, GpsProfile, Locator, LogWriter, Outcome, SimulatedGps, Subscribe};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn render(label: &str, outcome: &Outcome) {
    match outcome {
        Outcome::Success(fix) => println!("[{label}] tourist located at {fix}"),
        Outcome::DomainFailure { reason } => println!("[{label}] position not detectable: {reason}"),
        Outcome::TimeoutFailure { deadline } => {
            println!("[{label}] no position within {}s, try again", deadline.as_secs())
        }
        Outcome::InterruptedFailure => println!("[{label}] interrupted"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fixvisor=info")))
        .init();

    // A receiver that loses the signal half of the time.
    let profile = GpsProfile {
        signal_loss: 0.5,
        ..GpsProfile::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];

    let locator = Locator::builder(Config::default())
        .with_provider(Arc::new(SimulatedGps::new(profile)?))
        .with_subscribers(subs)
        .build()?;
    let signals = locator.interrupt_on_signal();

    render("single", &locator.acquire_position().await);
    render("retry", &locator.acquire_position_with_retry(3).await);

    locator.shutdown().await;
    signals.await??;
    Ok(())
}
