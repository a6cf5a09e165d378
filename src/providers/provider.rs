//! # Position provider abstraction.
//!
//! A [`PositionProvider`] performs **one** hardware read. The runtime calls it
//! once per attempt on a dedicated worker and hands it a fresh
//! [`CancellationToken`]; the token fires when the attempt's deadline expires or
//! the caller interrupts the acquisition.
//!
//! Providers never decide about retries or deadlines. They report either a fix
//! or a [`ProviderError`], and the runtime turns that into an
//! [`Outcome`](crate::Outcome).

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::position::PositionFix;

/// # Asynchronous, cancelable position read.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use fixvisor::{PositionFix, PositionProvider, ProviderError};
///
/// struct Fixed;
///
/// #[async_trait]
/// impl PositionProvider for Fixed {
///     fn name(&self) -> &str { "fixed" }
///
///     async fn acquire(&self, ctx: CancellationToken) -> Result<PositionFix, ProviderError> {
///         if ctx.is_cancelled() {
///             return Err(ProviderError::Canceled);
///         }
///         PositionFix::new(45.0, 9.0, 5.0).map_err(|e| ProviderError::unavailable(e.to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait PositionProvider: Send + Sync + 'static {
    /// Returns a stable, human-readable provider name.
    fn name(&self) -> &str;

    /// Performs a single read until completion or cancellation.
    ///
    /// Implementations should watch `ctx` while waiting on hardware and return
    /// [`ProviderError::Canceled`] once it fires. A result produced after
    /// cancellation is discarded by the runtime either way.
    async fn acquire(&self, ctx: CancellationToken) -> Result<PositionFix, ProviderError>;
}

/// Shared handle to a provider.
pub type ProviderRef = Arc<dyn PositionProvider>;
