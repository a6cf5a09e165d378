//! # Position providers.
//!
//! - [`PositionProvider`] - trait for one async, cancelable hardware read
//! - [`ProviderFn`] - function-backed provider (stubs, adapters)
//! - [`ProviderRef`] - shared handle (`Arc<dyn PositionProvider>`)
//! - [`SimulatedGps`] / [`GpsProfile`] - randomized reference receiver

mod provider;
mod provider_fn;
mod simulated;

pub use provider::{PositionProvider, ProviderRef};
pub use provider_fn::ProviderFn;
pub use simulated::{GpsProfile, SIGNAL_NOT_AVAILABLE, SimulatedGps};
