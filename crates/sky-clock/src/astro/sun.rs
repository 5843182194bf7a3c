//! Solar position from the low-precision mean-anomaly series.

use std::f64::consts::PI;

use super::coords::{altitude, azimuth_from_south, ecliptic_to_equatorial, Equatorial};
use super::time::{days_since_j2000, sidereal_time, RAD};
use super::CelestialPosition;

/// Perihelion of the Earth, radians.
const PERIHELION: f64 = RAD * 102.9372;

pub(crate) fn solar_mean_anomaly(days: f64) -> f64 {
    RAD * (357.5291 + 0.985_600_28 * days)
}

pub(crate) fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let m = mean_anomaly;
    // equation of center
    let c = RAD * (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin());
    m + c + PERIHELION + PI
}

/// Equatorial coordinates of the sun `days` after J2000.
pub(crate) fn sun_coords(days: f64) -> Equatorial {
    let l = ecliptic_longitude(solar_mean_anomaly(days));
    ecliptic_to_equatorial(l, 0.0)
}

/// Apparent sun position for an observer.
pub fn sun_position(unix_ms: f64, latitude: f64, longitude: f64) -> CelestialPosition {
    let lw = RAD * -longitude;
    let phi = RAD * latitude;
    let d = days_since_j2000(unix_ms);

    let c = sun_coords(d);
    let h = sidereal_time(d, lw) - c.right_ascension;

    CelestialPosition::new(
        altitude(h, phi, c.declination),
        azimuth_from_south(h, phi, c.declination) + PI,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const ATLANTA: (f64, f64) = (33.7490, -84.3880);
    /// 2024-12-21T17:35:30Z, local solar noon in Atlanta.
    const ATLANTA_NOON_MS: f64 = 1_734_802_530_000.0;
    const HALF_DAY_MS: f64 = 43_200_000.0;

    #[test]
    fn atlanta_solar_noon_is_due_south() {
        let pos = sun_position(ATLANTA_NOON_MS, ATLANTA.0, ATLANTA.1);
        assert!(pos.altitude > 0.0, "altitude = {}", pos.altitude);
        // Winter solstice: 90 - 33.75 - 23.44 ≈ 32.8 degrees
        assert!((pos.altitude.to_degrees() - 32.8).abs() < 1.0);
        assert!((pos.azimuth - PI).abs() < 0.05, "azimuth = {}", pos.azimuth);
    }

    #[test]
    fn atlanta_solar_midnight_is_below_horizon() {
        let pos = sun_position(ATLANTA_NOON_MS + HALF_DAY_MS, ATLANTA.0, ATLANTA.1);
        assert!(pos.altitude < 0.0);
        // Near due north
        let from_north = pos.azimuth.min(2.0 * PI - pos.azimuth);
        assert!(from_north < 0.1, "azimuth = {}", pos.azimuth);
    }

    #[test]
    fn equinox_declination_near_zero() {
        // 2024-03-20T03:06Z
        let d = days_since_j2000(1_710_903_960_000.0);
        let c = sun_coords(d);
        assert!(c.declination.abs() < 0.5 * RAD);
    }

    #[test]
    fn altitude_stays_in_range_over_sweep() {
        let mut lat = -89.999999;
        while lat <= 89.999999 {
            let mut lon = -179.0;
            while lon <= 180.0 {
                for hour in 0..24 {
                    let ms = ATLANTA_NOON_MS + hour as f64 * 3_600_000.0;
                    let pos = sun_position(ms, lat, lon);
                    assert!(pos.altitude >= -FRAC_PI_2 && pos.altitude <= FRAC_PI_2);
                    assert!(pos.azimuth >= 0.0 && pos.azimuth < 2.0 * PI);
                }
                lon += 37.0;
            }
            lat += 14.999_999_8;
        }
    }

    #[test]
    fn same_inputs_same_output() {
        let a = sun_position(ATLANTA_NOON_MS, 51.5, -0.12);
        let b = sun_position(ATLANTA_NOON_MS, 51.5, -0.12);
        assert_eq!(a, b);
    }
}
