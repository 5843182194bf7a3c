//! Per-tick light and color formulas.
//!
//! Everything here is a pure function of body positions so the clock can
//! apply the results to whichever nodes happen to be present.

use glam::{Mat3, Quat, Vec3};

/// Sun altitude (rad) below which the lamp switches on. Civil twilight.
pub const LAMP_ON_BELOW: f64 = -0.10472;

/// Sun altitude (rad) bounds of the coral overlay band. Astronomical twilight.
pub const TWILIGHT_BAND: f64 = 0.314159;

/// Floor for the ambient light intensity.
pub const AMBIENT_FLOOR: f32 = 0.5;

/// Sun tint derived from its altitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunTint {
    pub emissive: [f32; 3],
    pub light_color: [f32; 3],
    pub intensity: f32,
}

/// Redder near the horizon, whiter overhead.
pub fn sun_tint(altitude: f64) -> SunTint {
    let r = (altitude.cos().abs().powi(30) * 0.2 + 0.4) as f32;
    let intensity = ((altitude + 0.2).sin() * 20.0).clamp(0.0, 5.0) as f32;
    SunTint {
        emissive: [r + 0.3, 0.7 - r / 2.0, 0.5 - r / 2.0],
        light_color: [r, 0.5 - r / 2.0, 0.33 - r / 2.0],
        intensity,
    }
}

/// Moon light intensity.
///
/// Illumination grows as the sun moves behind the moon as seen from the
/// origin, and is scaled down while the sun is up or the moon is low.
pub fn moon_glow(sun: Vec3, moon: Vec3, sun_altitude: f64, moon_altitude: f64) -> f32 {
    let to_sun = (sun * 1000.0 - moon).normalize_or_zero();
    let illum = (1.0 - to_sun.dot(moon.normalize_or_zero())).max(0.0) * 2.5;
    let night = (-sun_altitude).sin().max(0.0) as f32;
    let moon_up = moon_altitude.sin().max(0.0) as f32;
    night * moon_up * illum
}

/// Rotation that points an object's +Z axis from `eye` at `target`.
///
/// Mirrors how three.js orients non-camera objects with `lookAt`, including
/// the nudge when the view direction is parallel to `up`.
pub fn look_at_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = target - eye;
    if z.length_squared() == 0.0 {
        z.z = 1.0;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        if up.z.abs() == 1.0 {
            z.x += 0.0001;
        } else {
            z.z += 0.0001;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    x = x.normalize();
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Orientation of the moon cover: its open side faces the distant sun.
pub fn terminator_orientation(moon: Vec3, sun: Vec3) -> Quat {
    look_at_rotation(moon, sun * 1000.0, Vec3::Y)
}

/// Ambient directional light tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ambient {
    pub color: [f32; 3],
    pub intensity: f32,
}

pub fn ambient(sun_altitude: f64) -> Ambient {
    let a = (sun_altitude.sin().max(0.0) * 0.4 - 0.2) as f32;
    Ambient {
        color: [0.5 + a, 0.5, 0.5 - a],
        intensity: (a * 1.5 + 0.8).max(AMBIENT_FLOOR),
    }
}

/// Lamp color. Off (black) in daylight, flickering orange after dusk.
/// `flicker` is a uniform sample in [0, 1).
pub fn lamp_color(sun_altitude: f64, flicker: f32) -> [f32; 3] {
    if sun_altitude > LAMP_ON_BELOW {
        [0.0, 0.0, 0.0]
    } else {
        [0.8 + 0.2 * flicker, 0.4, 0.0]
    }
}

/// CSS color of the overlay text for a sun altitude.
pub fn text_color(sun_altitude: f64) -> &'static str {
    if sun_altitude < -TWILIGHT_BAND {
        "cornflowerblue"
    } else if sun_altitude > TWILIGHT_BAND {
        "#5de356"
    } else {
        "coral"
    }
}

/// Cloud layer yaw: one full turn every 15 minutes.
pub fn cloud_spin(unix_ms: f64) -> f32 {
    (unix_ms.rem_euclid(900_000.0) / 450_000.0 * std::f64::consts::PI) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn sun_intensity_stays_in_range() {
        let mut alt = -PI;
        while alt <= PI {
            let t = sun_tint(alt);
            assert!((0.0..=5.0).contains(&t.intensity), "alt {alt}: {}", t.intensity);
            alt += 0.01;
        }
        assert_eq!(sun_tint(PI).intensity, 0.0);
        assert_eq!(sun_tint(-PI).intensity, 0.0);
        assert_eq!(sun_tint(FRAC_PI_2).intensity, 5.0);
    }

    #[test]
    fn sun_is_reddest_at_horizon() {
        let low = sun_tint(0.0);
        let high = sun_tint(FRAC_PI_2);
        assert!((low.light_color[0] - 0.6).abs() < 1e-6);
        assert!((high.light_color[0] - 0.4).abs() < 1e-6);
        assert!(low.emissive[1] < high.emissive[1]);
    }

    #[test]
    fn full_moon_glows_at_night() {
        // Sun below the horizon behind the observer, moon opposite and high.
        let sun = Vec3::new(0.0, -3.0, 5.0);
        let moon = Vec3::new(0.0, 3.0, -5.0);
        let glow = moon_glow(sun, moon, -0.5, 0.5);
        assert!(glow > 1.0, "{glow}");
    }

    #[test]
    fn no_moon_glow_in_daylight() {
        let sun = Vec3::new(0.0, 3.0, 5.0);
        let moon = Vec3::new(0.0, 3.0, -5.0);
        assert_eq!(moon_glow(sun, moon, 0.5, 0.5), 0.0);
    }

    #[test]
    fn no_moon_glow_below_horizon() {
        let sun = Vec3::new(0.0, -3.0, 5.0);
        let moon = Vec3::new(0.0, -1.0, -5.0);
        assert_eq!(moon_glow(sun, moon, -0.5, -0.2), 0.0);
    }

    #[test]
    fn new_moon_is_dark() {
        let sun = Vec3::new(0.0, 3.0, -5.0);
        let moon = Vec3::new(0.0, 3.0, -5.0);
        assert!(moon_glow(sun, moon, -0.5, 0.5).abs() < 1e-3);
    }

    #[test]
    fn look_at_points_z_at_target() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let target = Vec3::new(-4.0, 0.5, 7.0);
        let q = look_at_rotation(eye, target, Vec3::Y);
        let forward = q * Vec3::Z;
        let want = (target - eye).normalize();
        assert!((forward - want).length() < 1e-5);
    }

    #[test]
    fn look_at_straight_up_is_finite() {
        let q = look_at_rotation(Vec3::ZERO, Vec3::new(0.0, 10.0, 0.0), Vec3::Y);
        assert!(q.is_finite());
        assert!((q * Vec3::Z).y > 0.99);
    }

    #[test]
    fn terminator_is_deterministic() {
        let moon = Vec3::new(2.0, 4.0, -3.0);
        let sun = Vec3::new(-5.0, 1.0, 3.0);
        assert_eq!(terminator_orientation(moon, sun), terminator_orientation(moon, sun));
    }

    #[test]
    fn ambient_hits_floor_at_night() {
        let night = ambient(-0.8);
        assert!((night.intensity - AMBIENT_FLOOR).abs() < 1e-6);
        let noon = ambient(FRAC_PI_2);
        assert!((noon.intensity - 1.1).abs() < 1e-5);
        assert!((noon.color[0] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn lamp_follows_civil_twilight() {
        assert_eq!(lamp_color(0.0, 0.5), [0.0, 0.0, 0.0]);
        assert_eq!(lamp_color(-0.2, 0.0), [0.8, 0.4, 0.0]);
        let c = lamp_color(-0.2, 0.999);
        assert!(c[0] <= 1.0 && c[0] > 0.99);
    }

    #[test]
    fn text_color_bands() {
        assert_eq!(text_color(-0.5), "cornflowerblue");
        assert_eq!(text_color(0.0), "coral");
        assert_eq!(text_color(0.5), "#5de356");
    }

    #[test]
    fn clouds_turn_every_fifteen_minutes() {
        assert_eq!(cloud_spin(0.0), 0.0);
        assert!((cloud_spin(450_000.0) - std::f32::consts::PI).abs() < 1e-6);
        assert!(cloud_spin(900_000.0).abs() < 1e-6);
    }
}
