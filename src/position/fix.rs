//! # Acquired position value.
//!
//! [`PositionFix`] can only be built through [`PositionFix::new`], which rejects
//! anything outside the WGS84 coordinate ranges. Every fix carried by an
//! [`Outcome::Success`](crate::Outcome::Success) is therefore valid.
//!
//! ## Example
//! ```rust
//! use fixvisor::PositionFix;
//!
//! let fix = PositionFix::new(40.7128, -74.0060, 8.0).unwrap();
//! assert_eq!(fix.latitude(), 40.7128);
//!
//! assert!(PositionFix::new(90.5, 0.0, 1.0).is_err());
//! ```

use std::fmt;

use crate::error::FixError;

/// Latitude bound in degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Longitude bound in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Immutable position with an accuracy radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionFix {
    latitude: f64,
    longitude: f64,
    accuracy_meters: f64,
}

impl PositionFix {
    /// Validates and builds a fix.
    ///
    /// ### Rules
    /// - `latitude` in `[-90, 90]`
    /// - `longitude` in `[-180, 180]`
    /// - `accuracy_meters >= 0`
    /// - all values finite
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64) -> Result<Self, FixError> {
        if !latitude.is_finite() || latitude.abs() > MAX_LATITUDE {
            return Err(FixError::Latitude { value: latitude });
        }
        if !longitude.is_finite() || longitude.abs() > MAX_LONGITUDE {
            return Err(FixError::Longitude { value: longitude });
        }
        if !accuracy_meters.is_finite() || accuracy_meters < 0.0 {
            return Err(FixError::Accuracy {
                value: accuracy_meters,
            });
        }
        Ok(Self {
            latitude,
            longitude,
            accuracy_meters,
        })
    }

    /// Degrees north of the equator.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Degrees east of the prime meridian.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Radius of the 68% confidence circle, in meters.
    #[inline]
    pub fn accuracy_meters(&self) -> f64 {
        self.accuracy_meters
    }
}

impl fmt::Display for PositionFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, {:.6}) ±{:.1}m",
            self.latitude, self.longitude, self.accuracy_meters
        )
    }
}
