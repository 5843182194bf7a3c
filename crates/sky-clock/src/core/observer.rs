use serde::Serialize;

use crate::api::config::GeoPoint;
use crate::astro::{clamp_latitude, wrap_longitude};

/// Where the sky is seen from.
///
/// Latitude is clamped on every write, so the calculator never sees an exact
/// pole. A pinned observer ignores device location fixes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observer {
    latitude: f64,
    longitude: f64,
    pinned: bool,
}

impl Observer {
    /// Observer fixed at explicit coordinates.
    pub fn pinned(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: clamp_latitude(latitude),
            longitude: wrap_longitude(longitude),
            pinned: true,
        }
    }

    /// Observer at (0, 0) waiting for a device fix.
    pub fn awaiting_fix() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            pinned: false,
        }
    }

    pub fn from_config(position: Option<GeoPoint>) -> Self {
        match position {
            Some(p) => Self::pinned(p.latitude, p.longitude),
            None => Self::awaiting_fix(),
        }
    }

    /// Apply a device location fix. Returns `false` when pinned.
    pub fn apply_fix(&mut self, latitude: f64, longitude: f64) -> bool {
        if self.pinned {
            return false;
        }
        self.latitude = clamp_latitude(latitude);
        self.longitude = wrap_longitude(longitude);
        true
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }
}
