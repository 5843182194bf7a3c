//! Look angles toward a satellite from its sub-point fix.
//!
//! Tracking sources report where the satellite is over the ground (latitude,
//! longitude, height). The observer's view of it follows from spherical-Earth
//! geometry: both points go to Earth-centered coordinates, the difference is
//! rotated into the observer's east/north/up frame.

use glam::DVec3;
use serde::Deserialize;

use super::time::RAD;
use super::CelestialPosition;

/// Mean Earth radius, km.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Sub-point of a tracked satellite.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SatelliteFix {
    /// Geodetic latitude of the sub-point, degrees.
    pub latitude: f64,
    /// Longitude of the sub-point, degrees.
    pub longitude: f64,
    /// Height above mean sea level, km.
    #[serde(alias = "altitude")]
    pub altitude_km: f64,
}

fn earth_centered(latitude: f64, longitude: f64, radius_km: f64) -> DVec3 {
    let (sin_lat, cos_lat) = (latitude * RAD).sin_cos();
    let (sin_lon, cos_lon) = (longitude * RAD).sin_cos();
    DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat) * radius_km
}

/// Altitude/azimuth of `fix` seen from a ground observer.
pub fn look_angles(fix: &SatelliteFix, latitude: f64, longitude: f64) -> CelestialPosition {
    let sat = earth_centered(fix.latitude, fix.longitude, EARTH_RADIUS_KM + fix.altitude_km);
    let obs = earth_centered(latitude, longitude, EARTH_RADIUS_KM);
    let range = sat - obs;

    let (sin_lat, cos_lat) = (latitude * RAD).sin_cos();
    let (sin_lon, cos_lon) = (longitude * RAD).sin_cos();

    let east = -sin_lon * range.x + cos_lon * range.y;
    let north = -sin_lat * cos_lon * range.x - sin_lat * sin_lon * range.y + cos_lat * range.z;
    let up = cos_lat * cos_lon * range.x + cos_lat * sin_lon * range.y + sin_lat * range.z;

    CelestialPosition::new(up.atan2(east.hypot(north)), east.atan2(north))
}
