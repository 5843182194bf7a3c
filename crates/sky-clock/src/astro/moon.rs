//! Lunar position and illumination from a truncated series.

use std::f64::consts::PI;

use serde::Serialize;

use super::coords::{altitude, astro_refraction, azimuth_from_south, ecliptic_to_equatorial};
use super::sun::sun_coords;
use super::time::{days_since_j2000, sidereal_time, RAD};
use super::CelestialPosition;

/// Mean Earth–Sun distance, km.
const SUN_DISTANCE_KM: f64 = 149_598_000.0;

struct MoonCoords {
    right_ascension: f64,
    declination: f64,
    distance_km: f64,
}

fn moon_coords(days: f64) -> MoonCoords {
    let l = RAD * (218.316 + 13.176_396 * days); // ecliptic longitude
    let m = RAD * (134.963 + 13.064_993 * days); // mean anomaly
    let f = RAD * (93.272 + 13.229_350 * days); // mean distance

    let lon = l + RAD * 6.289 * m.sin();
    let lat = RAD * 5.128 * f.sin();
    let eq = ecliptic_to_equatorial(lon, lat);

    MoonCoords {
        right_ascension: eq.right_ascension,
        declination: eq.declination,
        distance_km: 385_001.0 - 20_905.0 * m.cos(),
    }
}

/// Apparent moon position plus the quantities needed to orient its disc.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonPosition {
    pub position: CelestialPosition,
    pub distance_km: f64,
    pub parallactic_angle: f64,
}

/// Moon position for an observer, with atmospheric refraction applied.
pub fn moon_position(unix_ms: f64, latitude: f64, longitude: f64) -> MoonPosition {
    let lw = RAD * -longitude;
    let phi = RAD * latitude;
    let d = days_since_j2000(unix_ms);

    let c = moon_coords(d);
    let h = sidereal_time(d, lw) - c.right_ascension;
    let alt = altitude(h, phi, c.declination);
    let parallactic_angle =
        h.sin().atan2(phi.tan() * c.declination.cos() - c.declination.sin() * h.cos());

    MoonPosition {
        position: CelestialPosition::new(
            alt + astro_refraction(alt),
            azimuth_from_south(h, phi, c.declination) + PI,
        ),
        distance_km: c.distance_km,
        parallactic_angle,
    }
}

/// Illuminated fraction and phase of the moon.
///
/// `phase` runs 0 (new) → 0.25 (first quarter) → 0.5 (full) → 0.75 (last quarter) → 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoonIllumination {
    pub fraction: f64,
    pub phase: f64,
    pub angle: f64,
}

impl MoonIllumination {
    /// Short name of the current phase for display.
    pub fn phase_name(&self) -> &'static str {
        let p = self.phase;
        if !(0.0625..0.9375).contains(&p) {
            "New"
        } else if p < 0.1875 {
            "Waxing Crescent"
        } else if p < 0.3125 {
            "First Quarter"
        } else if p < 0.4375 {
            "Waxing Gibbous"
        } else if p < 0.5625 {
            "Full"
        } else if p < 0.6875 {
            "Waning Gibbous"
        } else if p < 0.8125 {
            "Last Quarter"
        } else {
            "Waning Crescent"
        }
    }
}

pub fn moon_illumination(unix_ms: f64) -> MoonIllumination {
    let d = days_since_j2000(unix_ms);
    let s = sun_coords(d);
    let m = moon_coords(d);

    let d_ra = s.right_ascension - m.right_ascension;
    // geocentric elongation
    let phi = (s.declination.sin() * m.declination.sin()
        + s.declination.cos() * m.declination.cos() * d_ra.cos())
    .clamp(-1.0, 1.0)
    .acos();
    let inc = (SUN_DISTANCE_KM * phi.sin()).atan2(m.distance_km - SUN_DISTANCE_KM * phi.cos());
    let angle = (s.declination.cos() * d_ra.sin()).atan2(
        s.declination.sin() * m.declination.cos()
            - s.declination.cos() * m.declination.sin() * d_ra.cos(),
    );
    let sign = if angle < 0.0 { -1.0 } else { 1.0 };

    MoonIllumination {
        fraction: (1.0 + inc.cos()) / 2.0,
        phase: 0.5 + 0.5 * inc * sign / PI,
        angle,
    }
}
