//! Instant conversions shared by the ephemeris functions.
//!
//! Instants are Unix milliseconds (UTC) as handed over by the host clock.

use std::f64::consts::PI;

pub const RAD: f64 = PI / 180.0;

const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
/// Julian Day of the J2000.0 epoch.
pub const J2000: f64 = 2_451_545.0;

/// Julian Day for a Unix millisecond instant.
pub fn to_julian(unix_ms: f64) -> f64 {
    unix_ms / DAY_MS - 0.5 + J1970
}

/// Days since J2000.0.
pub fn days_since_j2000(unix_ms: f64) -> f64 {
    to_julian(unix_ms) - J2000
}

/// Julian centuries since J2000.0.
pub fn centuries_since_j2000(unix_ms: f64) -> f64 {
    days_since_j2000(unix_ms) / 36_525.0
}

/// Local sidereal time in radians for `days` since J2000 and west longitude `lw` (radians).
pub fn sidereal_time(days: f64, lw: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * days) - lw
}
