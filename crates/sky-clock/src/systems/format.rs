//! Overlay strings.

use chrono::{DateTime, NaiveDateTime};

use crate::astro::{CelestialPosition, MoonIllumination};

/// Civil wall-clock time at `unix_ms` shifted by `offset_minutes` east of UTC.
/// `None` when the instant is outside chrono's range.
pub fn civil_time(unix_ms: f64, offset_minutes: i32) -> Option<NaiveDateTime> {
    if !unix_ms.is_finite() {
        return None;
    }
    let shifted = unix_ms as i64 + i64::from(offset_minutes) * 60_000;
    DateTime::from_timestamp_millis(shifted).map(|dt| dt.naive_utc())
}

pub fn time_text(civil: Option<&NaiveDateTime>) -> String {
    match civil {
        Some(t) => t.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

pub fn date_text(civil: Option<&NaiveDateTime>) -> String {
    match civil {
        Some(t) => t.format("%A, %B %-d, %Y").to_string(),
        None => String::new(),
    }
}

/// `UTC`, `UTC+05:30`, `UTC-05:00`.
pub fn timezone_text(offset_minutes: i32) -> String {
    if offset_minutes == 0 {
        return "UTC".to_string();
    }
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let abs = offset_minutes.unsigned_abs();
    format!("UTC{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

pub fn coordinates_text(latitude: f64, longitude: f64) -> String {
    format!("GCS [{}, {}]", latitude, longitude)
}

pub fn sun_text(sun: &CelestialPosition) -> String {
    let [alt, az] = sun.degrees_rounded();
    format!("☉ Alt/Az [{}, {}]", alt, az)
}

pub fn moon_text(moon: &CelestialPosition, illumination: &MoonIllumination) -> String {
    let [alt, az] = moon.degrees_rounded();
    format!(
        "☾ Alt/Az [{}, {}] {} {}%",
        alt,
        az,
        illumination.phase_name(),
        (illumination.fraction * 100.0).round()
    )
}
