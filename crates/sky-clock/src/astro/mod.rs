//! Astronomical position calculator.
//!
//! Pure functions from `(instant, latitude, longitude)` to apparent horizontal
//! coordinates. Precision targets visual plausibility near the present, not
//! ephemeris-grade accuracy. Uses f64 throughout; the scene converts to f32
//! only when writing transforms.

pub mod coords;
pub mod moon;
pub mod planets;
pub mod satellite;
pub mod sun;
pub mod time;

use glam::Vec3;
use serde::Serialize;

pub use moon::{moon_illumination, moon_position, MoonIllumination, MoonPosition};
pub use planets::{planet_position, planet_positions, Planet, PlanetPositions};
pub use satellite::{look_angles, SatelliteFix};
pub use sun::sun_position;

/// Lowest latitude the calculator accepts. Exact poles make azimuth degenerate.
pub const MIN_LATITUDE: f64 = -89.999999;
/// Highest latitude the calculator accepts.
pub const MAX_LATITUDE: f64 = 89.999999;

/// Apparent position of a body for one observer at one instant.
///
/// `altitude` is in [-π/2, π/2]. `azimuth` is measured from north,
/// clockwise through east, in [0, 2π): due south is π.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CelestialPosition {
    pub altitude: f64,
    pub azimuth: f64,
}

impl CelestialPosition {
    pub fn new(altitude: f64, azimuth: f64) -> Self {
        Self {
            altitude: altitude.clamp(-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2),
            azimuth: azimuth.rem_euclid(std::f64::consts::TAU),
        }
    }

    /// Whether the body is above the geometric horizon.
    pub fn is_up(&self) -> bool {
        self.altitude > 0.0
    }

    /// Project onto a sphere of `radius` around the origin.
    ///
    /// Scene axes: +Y up, -Z north, +X east.
    pub fn to_scene(&self, radius: f32) -> Vec3 {
        let (alt, az) = (self.altitude as f32, self.azimuth as f32);
        Vec3::new(
            az.sin() * alt.cos() * radius,
            alt.sin() * radius,
            -az.cos() * alt.cos() * radius,
        )
    }

    /// `[altitude, azimuth]` in degrees rounded to two decimals, as shown in the overlay.
    pub fn degrees_rounded(&self) -> [f64; 2] {
        let round = |rad: f64| (rad.to_degrees() * 100.0).round() / 100.0;
        [round(self.altitude), round(self.azimuth)]
    }
}

/// Clamp a latitude into the open polar range.
pub fn clamp_latitude(latitude: f64) -> f64 {
    if latitude.is_nan() {
        return 0.0;
    }
    latitude.clamp(MIN_LATITUDE, MAX_LATITUDE)
}

/// Wrap a longitude into (-180, 180].
pub fn wrap_longitude(longitude: f64) -> f64 {
    if !longitude.is_finite() {
        return 0.0;
    }
    if longitude > -180.0 && longitude <= 180.0 {
        return longitude;
    }
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}
