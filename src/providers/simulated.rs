//! # Simulated GPS receiver.
//!
//! [`SimulatedGps`] stands in for hardware: each read waits a random latency,
//! loses the signal with a fixed probability, and otherwise reports a fix
//! scattered around a base coordinate.
//!
//! All draws come from one seedable RNG, so [`SimulatedGps::seeded`] replays
//! the same sequence of reads.
//!
//! ## Read flow
//! ```text
//! acquire(ctx)
//!   ├─► draw latency, signal-loss coin, offsets, accuracy (under lock)
//!   ├─► select! { sleep(latency), ctx.cancelled() → Err(Canceled) }
//!   ├─► signal lost → Err(SignalUnavailable("signal not available"))
//!   └─► Ok(PositionFix(base ± offset, accuracy))
//! ```

use std::borrow::Cow;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio_util::sync::CancellationToken;

use crate::error::{ConfigError, ProviderError};
use crate::position::PositionFix;
use crate::providers::provider::PositionProvider;

/// Reason reported when the simulated signal is lost.
pub const SIGNAL_NOT_AVAILABLE: &str = "signal not available";

/// Largest scatter offset a profile may use.
const MAX_OFFSET_DEGREES: f64 = 180.0;

/// Behaviour of the simulated receiver.
///
/// The default keeps `latency_max` below the default 5s deadline, so every
/// read that keeps its signal succeeds in time.
#[derive(Clone, Debug, PartialEq)]
pub struct GpsProfile {
    /// Latitude the fixes scatter around.
    pub base_latitude: f64,
    /// Longitude the fixes scatter around.
    pub base_longitude: f64,
    /// Maximum offset applied to each coordinate, in degrees.
    pub offset_degrees: f64,
    /// Shortest simulated read.
    pub latency_min: Duration,
    /// Longest simulated read.
    pub latency_max: Duration,
    /// Smallest reported accuracy radius (m).
    pub accuracy_min: f64,
    /// Largest reported accuracy radius (m).
    pub accuracy_max: f64,
    /// Probability in `[0, 1]` that a read loses the signal.
    pub signal_loss: f64,
}

impl Default for GpsProfile {
    /// Default profile:
    ///
    /// - base `40.7128, -74.0060`, offset `±0.01°`
    /// - latency `500ms..=4s`
    /// - accuracy `3..=25 m`
    /// - signal loss `20%`
    fn default() -> Self {
        Self {
            base_latitude: 40.7128,
            base_longitude: -74.0060,
            offset_degrees: 0.01,
            latency_min: Duration::from_millis(500),
            latency_max: Duration::from_secs(4),
            accuracy_min: 3.0,
            accuracy_max: 25.0,
            signal_loss: 0.2,
        }
    }
}

impl GpsProfile {
    /// Checks that every range is non-empty, the offset is finite and within
    /// `[0, 180]` degrees, and the base coordinate is valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        PositionFix::new(self.base_latitude, self.base_longitude, 0.0)?;
        if self.latency_min > self.latency_max {
            return Err(ConfigError::InvertedLatency {
                min: self.latency_min,
                max: self.latency_max,
            });
        }
        let accuracy_ok = self.accuracy_min.is_finite()
            && self.accuracy_max.is_finite()
            && self.accuracy_min >= 0.0
            && self.accuracy_min <= self.accuracy_max;
        if !accuracy_ok {
            return Err(ConfigError::InvalidAccuracy {
                min: self.accuracy_min,
                max: self.accuracy_max,
            });
        }
        if !(0.0..=MAX_OFFSET_DEGREES).contains(&self.offset_degrees) {
            return Err(ConfigError::Offset {
                value: self.offset_degrees,
            });
        }
        if !(0.0..=1.0).contains(&self.signal_loss) {
            return Err(ConfigError::Probability {
                value: self.signal_loss,
            });
        }
        Ok(())
    }

    /// True when even the slowest read finishes strictly before `deadline`.
    pub fn fits_within(&self, deadline: Duration) -> bool {
        self.latency_max < deadline
    }
}

/// Everything random about one read, drawn up front.
struct Draw {
    latency: Duration,
    signal_lost: bool,
    latitude: f64,
    longitude: f64,
    accuracy: f64,
}

/// Randomized stand-in for a GPS receiver.
pub struct SimulatedGps {
    name: Cow<'static, str>,
    profile: GpsProfile,
    rng: Mutex<StdRng>,
}

impl SimulatedGps {
    /// Creates a receiver seeded from the OS.
    pub fn new(profile: GpsProfile) -> Result<Self, ConfigError> {
        Self::with_rng(profile, StdRng::from_os_rng())
    }

    /// Creates a receiver whose reads are reproducible for a given `seed`.
    pub fn seeded(profile: GpsProfile, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(profile, StdRng::seed_from_u64(seed))
    }

    fn with_rng(profile: GpsProfile, rng: StdRng) -> Result<Self, ConfigError> {
        profile.validate()?;
        Ok(Self {
            name: Cow::Borrowed("simulated-gps"),
            profile,
            rng: Mutex::new(rng),
        })
    }

    /// Overrides the provider name shown in events.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Profile this receiver was built with.
    pub fn profile(&self) -> &GpsProfile {
        &self.profile
    }

    fn draw(&self) -> Draw {
        let p = &self.profile;
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        let min_ms = p.latency_min.as_millis() as u64;
        let max_ms = p.latency_max.as_millis() as u64;
        let latency = Duration::from_millis(rng.random_range(min_ms..=max_ms));
        let signal_lost = rng.random_bool(p.signal_loss);

        let offset = p.offset_degrees;
        let d_lat = if offset > 0.0 {
            rng.random_range(-offset..=offset)
        } else {
            0.0
        };
        let d_lon = if offset > 0.0 {
            rng.random_range(-offset..=offset)
        } else {
            0.0
        };
        let accuracy = rng.random_range(p.accuracy_min..=p.accuracy_max);

        Draw {
            latency,
            signal_lost,
            latitude: (p.base_latitude + d_lat).clamp(-90.0, 90.0),
            longitude: (p.base_longitude + d_lon).clamp(-180.0, 180.0),
            accuracy,
        }
    }
}

#[async_trait]
impl PositionProvider for SimulatedGps {
    fn name(&self) -> &str {
        &self.name
    }

    async fn acquire(&self, ctx: CancellationToken) -> Result<PositionFix, ProviderError> {
        let draw = self.draw();

        tokio::select! {
            _ = ctx.cancelled() => return Err(ProviderError::Canceled),
            _ = tokio::time::sleep(draw.latency) => {}
        }

        if draw.signal_lost {
            return Err(ProviderError::unavailable(SIGNAL_NOT_AVAILABLE));
        }
        PositionFix::new(draw.latitude, draw.longitude, draw.accuracy)
            .map_err(|e| ProviderError::unavailable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_profile() -> GpsProfile {
        GpsProfile {
            latency_min: Duration::from_millis(10),
            latency_max: Duration::from_millis(50),
            ..GpsProfile::default()
        }
    }

    #[test]
    fn default_profile_is_valid_and_fits_default_deadline() {
        let profile = GpsProfile::default();
        assert_eq!(profile.validate(), Ok(()));
        assert!(profile.fits_within(Duration::from_secs(5)));
        assert!(!profile.fits_within(Duration::from_secs(4)));
    }

    #[test]
    fn rejects_bad_profiles() {
        let inverted = GpsProfile {
            latency_min: Duration::from_secs(2),
            latency_max: Duration::from_secs(1),
            ..GpsProfile::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::InvertedLatency { .. })
        ));

        let probability = GpsProfile {
            signal_loss: 1.5,
            ..GpsProfile::default()
        };
        assert!(matches!(
            probability.validate(),
            Err(ConfigError::Probability { .. })
        ));

        let accuracy = GpsProfile {
            accuracy_min: -1.0,
            ..GpsProfile::default()
        };
        assert!(matches!(
            accuracy.validate(),
            Err(ConfigError::InvalidAccuracy { .. })
        ));

        for value in [f64::INFINITY, f64::NAN, -0.5, 1e308] {
            let offset = GpsProfile {
                offset_degrees: value,
                ..GpsProfile::default()
            };
            assert!(matches!(
                offset.validate(),
                Err(ConfigError::Offset { .. })
            ));
        }

        let base = GpsProfile {
            base_latitude: 123.0,
            ..GpsProfile::default()
        };
        assert!(matches!(
            base.validate(),
            Err(ConfigError::BasePosition(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn fixes_stay_in_range_near_the_base() {
        let gps = SimulatedGps::seeded(
            GpsProfile {
                signal_loss: 0.0,
                ..quick_profile()
            },
            7,
        )
        .unwrap();

        for _ in 0..200 {
            let fix = gps.acquire(CancellationToken::new()).await.unwrap();
            assert!((fix.latitude() - 40.7128).abs() <= 0.01 + f64::EPSILON);
            assert!((fix.longitude() + 74.0060).abs() <= 0.01 + f64::EPSILON);
            assert!((3.0..=25.0).contains(&fix.accuracy_meters()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn offsets_near_the_pole_are_clamped() {
        let gps = SimulatedGps::seeded(
            GpsProfile {
                base_latitude: 90.0,
                base_longitude: 180.0,
                offset_degrees: 1.0,
                signal_loss: 0.0,
                ..quick_profile()
            },
            11,
        )
        .unwrap();

        for _ in 0..100 {
            let fix = gps.acquire(CancellationToken::new()).await.unwrap();
            assert!(fix.latitude() <= 90.0);
            assert!(fix.longitude() <= 180.0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn certain_signal_loss_always_fails() {
        let gps = SimulatedGps::seeded(
            GpsProfile {
                signal_loss: 1.0,
                ..quick_profile()
            },
            3,
        )
        .unwrap();

        let err = gps.acquire(CancellationToken::new()).await.unwrap_err();
        assert_eq!(err, ProviderError::unavailable(SIGNAL_NOT_AVAILABLE));
    }

    #[tokio::test(start_paused = true)]
    async fn same_seed_replays_the_same_reads() {
        let profile = quick_profile();
        let a = SimulatedGps::seeded(profile.clone(), 42).unwrap();
        let b = SimulatedGps::seeded(profile, 42).unwrap();

        for _ in 0..20 {
            let ra = a.acquire(CancellationToken::new()).await;
            let rb = b.acquire(CancellationToken::new()).await;
            assert_eq!(ra, rb);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_read_returns_no_fix() {
        let gps = SimulatedGps::seeded(
            GpsProfile {
                latency_min: Duration::from_secs(3),
                latency_max: Duration::from_secs(3),
                signal_loss: 0.0,
                ..GpsProfile::default()
            },
            5,
        )
        .unwrap();

        let token = CancellationToken::new();
        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });

        let started = tokio::time::Instant::now();
        let res = gps.acquire(token).await;
        assert_eq!(res, Err(ProviderError::Canceled));
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
