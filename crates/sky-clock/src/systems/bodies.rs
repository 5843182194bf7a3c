//! Where the bodies sit in the scene for a given instant.

use glam::Vec3;

use crate::api::config::FeatureSet;
use crate::astro::{
    moon_illumination, moon_position, planet_positions, sun_position, CelestialPosition,
    MoonIllumination, MoonPosition, PlanetPositions,
};
use crate::core::observer::Observer;

pub const SUN_RADIUS: f32 = 6.0;
pub const PLANET_RADIUS: f32 = 6.0;
pub const MOON_RADIUS: f32 = 5.6;
pub const SATELLITE_RADIUS: f32 = 5.4;

/// All body positions for one tick.
#[derive(Debug, Clone, Copy)]
pub struct SkySnapshot {
    pub sun: CelestialPosition,
    pub moon: MoonPosition,
    pub illumination: MoonIllumination,
    /// `None` when planets are disabled.
    pub planets: Option<PlanetPositions>,
}

impl SkySnapshot {
    pub fn compute(unix_ms: f64, observer: &Observer, features: &FeatureSet) -> Self {
        let (lat, lon) = (observer.latitude(), observer.longitude());
        Self {
            sun: sun_position(unix_ms, lat, lon),
            moon: moon_position(unix_ms, lat, lon),
            illumination: moon_illumination(unix_ms),
            planets: features
                .planets
                .then(|| planet_positions(unix_ms, lat, lon)),
        }
    }

    pub fn sun_scene(&self) -> Vec3 {
        self.sun.to_scene(SUN_RADIUS)
    }

    pub fn moon_scene(&self) -> Vec3 {
        self.moon.position.to_scene(MOON_RADIUS)
    }
}
