//! Frame rotations: ecliptic → equatorial → horizontal.

use super::time::RAD;

/// Obliquity of the ecliptic (J2000), radians.
pub const OBLIQUITY: f64 = RAD * 23.4397;

/// Equatorial coordinates (radians).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equatorial {
    pub right_ascension: f64,
    pub declination: f64,
}

/// Ecliptic longitude/latitude → equatorial.
pub fn ecliptic_to_equatorial(longitude: f64, latitude: f64) -> Equatorial {
    let (sin_e, cos_e) = OBLIQUITY.sin_cos();
    let right_ascension =
        (longitude.sin() * cos_e - latitude.tan() * sin_e).atan2(longitude.cos());
    let declination =
        (latitude.sin() * cos_e + latitude.cos() * sin_e * longitude.sin()).clamp(-1.0, 1.0).asin();
    Equatorial {
        right_ascension,
        declination,
    }
}

/// Rectangular ecliptic vector → equatorial right ascension / declination.
pub fn ecliptic_vector_to_equatorial(x: f64, y: f64, z: f64) -> Equatorial {
    let (sin_e, cos_e) = OBLIQUITY.sin_cos();
    let xe = x;
    let ye = y * cos_e - z * sin_e;
    let ze = y * sin_e + z * cos_e;
    let r = (xe * xe + ye * ye + ze * ze).sqrt();
    if r < 1e-12 {
        return Equatorial {
            right_ascension: 0.0,
            declination: 0.0,
        };
    }
    Equatorial {
        right_ascension: ye.atan2(xe),
        declination: (ze / r).clamp(-1.0, 1.0).asin(),
    }
}

/// Altitude for hour angle `h`, latitude `phi` and declination `dec` (all radians).
pub fn altitude(h: f64, phi: f64, dec: f64) -> f64 {
    (phi.sin() * dec.sin() + phi.cos() * dec.cos() * h.cos())
        .clamp(-1.0, 1.0)
        .asin()
}

/// Azimuth measured from south, positive toward west.
///
/// Callers add π to move to the north-based convention used by the scene.
pub fn azimuth_from_south(h: f64, phi: f64, dec: f64) -> f64 {
    h.sin().atan2(h.cos() * phi.sin() - dec.tan() * phi.cos())
}

/// Refraction correction for a true altitude `h` (radians).
/// Valid near and above the horizon; negative altitudes are treated as zero.
pub fn astro_refraction(h: f64) -> f64 {
    let h = h.max(0.0);
    0.000_296_7 / (h + 0.003_125_36 / (h + 0.089_011_79)).tan()
}
