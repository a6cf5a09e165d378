use std::sync::Arc;

use crate::{
    core::{Config, DeadlineSupervisor, RetryOrchestrator, locator::Locator},
    error::ConfigError,
    events::Bus,
    providers::{GpsProfile, ProviderRef, SimulatedGps},
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Locator`].
pub struct LocatorBuilder {
    cfg: Config,
    provider: Option<ProviderRef>,
    profile: GpsProfile,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl LocatorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            provider: None,
            profile: GpsProfile::default(),
            subscribers: Vec::new(),
        }
    }

    /// Sets the position provider.
    ///
    /// Defaults to a [`SimulatedGps`] with [`GpsProfile::default`].
    pub fn with_provider(mut self, provider: ProviderRef) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Sets the profile of the default [`SimulatedGps`].
    ///
    /// Ignored when a provider is set with [`with_provider`](Self::with_provider).
    pub fn with_profile(mut self, profile: GpsProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive attempt lifecycle events through dedicated workers
    /// with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Validates the configuration and starts the locator.
    ///
    /// Without an explicit provider, the simulated receiver's slowest read
    /// must finish before `cfg.deadline`, otherwise
    /// [`ConfigError::LatencyExceedsDeadline`] is returned.
    ///
    /// Spawns the subscriber workers and the event listener, so it must be
    /// called from within a tokio runtime.
    pub fn build(self) -> Result<Arc<Locator>, ConfigError> {
        self.cfg.validate()?;
        let provider = match self.provider {
            Some(p) => p,
            None => {
                if !self.profile.fits_within(self.cfg.deadline) {
                    return Err(ConfigError::LatencyExceedsDeadline {
                        latency_max: self.profile.latency_max,
                        deadline: self.cfg.deadline,
                    });
                }
                Arc::new(SimulatedGps::new(self.profile)?)
            }
        };

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        let supervisor = DeadlineSupervisor::new(self.cfg.deadline, bus.clone())
            .with_release_grace(self.cfg.release_grace);
        let orchestrator = RetryOrchestrator::new(supervisor, self.cfg.backoff, bus.clone());

        Ok(Arc::new(Locator::new_internal(
            self.cfg,
            provider,
            bus,
            orchestrator,
            subs,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn zero_deadline_is_rejected() {
        let cfg = Config {
            deadline: Duration::ZERO,
            ..Config::default()
        };
        let err = LocatorBuilder::new(cfg).build().err();
        assert_eq!(err, Some(ConfigError::ZeroDeadline));
    }

    #[tokio::test]
    async fn default_receiver_must_fit_the_deadline() {
        let cfg = Config {
            deadline: Duration::from_millis(300),
            ..Config::default()
        };
        let err = LocatorBuilder::new(cfg.clone()).build().err();
        assert_eq!(
            err,
            Some(ConfigError::LatencyExceedsDeadline {
                latency_max: Duration::from_secs(4),
                deadline: Duration::from_millis(300),
            })
        );

        let quick = GpsProfile {
            latency_min: Duration::from_millis(50),
            latency_max: Duration::from_millis(200),
            ..GpsProfile::default()
        };
        let locator = LocatorBuilder::new(cfg).with_profile(quick).build().unwrap();
        locator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn short_deadline_with_a_fitting_profile_reaches_success() {
        let cfg = Config {
            deadline: Duration::from_millis(300),
            ..Config::default()
        };
        let quick = GpsProfile {
            latency_min: Duration::from_millis(50),
            latency_max: Duration::from_millis(200),
            signal_loss: 0.0,
            ..GpsProfile::default()
        };
        let locator = LocatorBuilder::new(cfg).with_profile(quick).build().unwrap();

        for _ in 0..20 {
            assert!(locator.acquire_position().await.is_success());
        }
        locator.shutdown().await;
    }

    #[tokio::test]
    async fn explicit_provider_skips_the_profile_check() {
        let cfg = Config {
            deadline: Duration::from_millis(300),
            ..Config::default()
        };
        let provider = Arc::new(SimulatedGps::new(GpsProfile::default()).unwrap());
        let locator = LocatorBuilder::new(cfg).with_provider(provider).build().unwrap();
        locator.shutdown().await;
    }

    #[tokio::test]
    async fn defaults_to_the_simulated_receiver() {
        let locator = LocatorBuilder::new(Config::default()).build().unwrap();
        assert_eq!(locator.provider_name(), "simulated-gps");
        assert_eq!(locator.config().deadline, Duration::from_secs(5));
        locator.shutdown().await;
    }
}
