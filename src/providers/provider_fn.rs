//! # Function-backed provider (`ProviderFn`)
//!
//! [`ProviderFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a
//! fresh future per attempt. This is the injection point for deterministic
//! stubs: a test decides latency and result per call, with shared counters kept
//! in an explicit `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use fixvisor::{PositionFix, ProviderError, ProviderFn, ProviderRef};
//!
//! let stub: ProviderRef = ProviderFn::arc("stub", |_ctx: CancellationToken| async move {
//!     tokio::time::sleep(Duration::from_millis(10)).await;
//!     Err::<PositionFix, _>(ProviderError::unavailable("signal not available"))
//! });
//!
//! assert_eq!(stub.name(), "stub");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ProviderError;
use crate::position::PositionFix;
use crate::providers::provider::PositionProvider;

/// Function-backed provider implementation.
///
/// Wraps a closure that *creates* a new future per attempt.
#[derive(Debug)]
pub struct ProviderFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ProviderFn<F> {
    /// Creates a new function-backed provider.
    ///
    /// Prefer [`ProviderFn::arc`] when you immediately need a
    /// [`ProviderRef`](crate::ProviderRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the provider and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> PositionProvider for ProviderFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<PositionFix, ProviderError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn acquire(&self, ctx: CancellationToken) -> Result<PositionFix, ProviderError> {
        (self.f)(ctx).await
    }
}
