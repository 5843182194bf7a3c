//! Widget configuration, read once from the hosting page's query string.

use log::{debug, warn};
use serde::Serialize;

use crate::api::error::ConfigError;
use crate::api::types::{FrameRate, PovMode};
use crate::astro::{clamp_latitude, wrap_longitude};

/// Smallest UTC offset in use anywhere (UTC−12:00), minutes.
const MIN_TZ_MINUTES: i32 = -12 * 60;
/// Largest UTC offset in use anywhere (UTC+14:00), minutes.
const MAX_TZ_MINUTES: i32 = 14 * 60;

/// Which feature set the widget runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Sun, moon, lights and the clock overlay.
    Base,
    /// Base plus planets, satellite tracking and the POV toggle.
    Extended,
}

/// Optional subsystems, derived from the [`Variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureSet {
    pub planets: bool,
    pub satellite: bool,
    pub pov_toggle: bool,
}

impl FeatureSet {
    pub const BASE: FeatureSet = FeatureSet {
        planets: false,
        satellite: false,
        pov_toggle: false,
    };

    pub const EXTENDED: FeatureSet = FeatureSet {
        planets: true,
        satellite: true,
        pov_toggle: true,
    };

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Base => Self::BASE,
            Variant::Extended => Self::EXTENDED,
        }
    }
}

/// A fixed observer location given explicitly by the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Camera/perspective parameters accepted but not yet consumed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReservedParams {
    pub x: Option<String>,
    pub y: Option<String>,
    pub z: Option<String>,
    pub del: Option<String>,
    pub pov: Option<String>,
    pub rot: Option<String>,
    pub det: Option<String>,
}

impl ReservedParams {
    fn slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "x" => Some(&mut self.x),
            "y" => Some(&mut self.y),
            "z" => Some(&mut self.z),
            "del" => Some(&mut self.del),
            "pov" => Some(&mut self.pov),
            "rot" => Some(&mut self.rot),
            "det" => Some(&mut self.det),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything the clock needs to know before its first tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClockConfig {
    /// Explicit observer location. `None` means device geolocation.
    pub position: Option<GeoPoint>,
    /// Displayed UTC offset in minutes east of UTC, overriding the device zone.
    pub timezone_override: Option<i32>,
    pub variant: Variant,
    pub features: FeatureSet,
    pub frame_rate: FrameRate,
    pub pov: PovMode,
    /// Minimum spacing between satellite lookups.
    pub satellite_poll_interval_ms: f64,
    /// Delay before the first satellite lookup after construction.
    pub first_satellite_poll_delay_ms: f64,
    /// Seed for the lamp flicker.
    pub rng_seed: u64,
    pub reserved: ReservedParams,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            position: None,
            timezone_override: None,
            variant: Variant::Extended,
            features: FeatureSet::EXTENDED,
            frame_rate: FrameRate::Low,
            pov: PovMode::Third,
            satellite_poll_interval_ms: 2000.0,
            first_satellite_poll_delay_ms: 100.0,
            rng_seed: 0x5EED_C10C,
            reserved: ReservedParams::default(),
        }
    }
}

impl ClockConfig {
    /// Build a config from a query string, logging every value that had to be
    /// clamped or ignored.
    pub fn from_query(query: &str) -> Self {
        let (config, problems) = Self::parse_query(query);
        for problem in &problems {
            warn!("config: {problem}");
        }
        if !config.reserved.is_empty() {
            debug!("config: reserved parameters present: {:?}", config.reserved);
        }
        config
    }

    /// Parse a query string (with or without the leading `?`).
    ///
    /// Never fails: the returned config is always usable, and the second
    /// element lists what was corrected.
    pub fn parse_query(query: &str) -> (Self, Vec<ConfigError>) {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut config = Self::default();
        let mut problems = Vec::new();

        let mut lat = None;
        let mut lon = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let key = key.as_ref();
            let value = value.trim();
            match key {
                "lat" => lat = parse_number(key, value, &mut problems),
                "lon" => lon = parse_number(key, value, &mut problems),
                "tz" => {
                    config.timezone_override = parse_number(key, value, &mut problems)
                        .map(|minutes| clamp_timezone(minutes, &mut problems));
                }
                "variant" => match value.to_ascii_lowercase().as_str() {
                    "base" => config.variant = Variant::Base,
                    "extended" => config.variant = Variant::Extended,
                    _ => problems.push(ConfigError::UnknownValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    }),
                },
                other => {
                    if let Some(slot) = config.reserved.slot(other) {
                        *slot = Some(value.to_string());
                    }
                }
            }
        }

        config.position = match (lat, lon) {
            (Some(latitude), Some(longitude)) => {
                let clamped = clamp_latitude(latitude);
                if clamped != latitude {
                    problems.push(ConfigError::OutOfRange {
                        key: "lat".into(),
                        value: latitude,
                        used: clamped,
                    });
                }
                Some(GeoPoint {
                    latitude: clamped,
                    longitude: wrap_longitude(longitude),
                })
            }
            (None, None) => None,
            _ => {
                problems.push(ConfigError::HalfCoordinate);
                None
            }
        };
        config.features = FeatureSet::for_variant(config.variant);

        (config, problems)
    }

    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.position = Some(GeoPoint {
            latitude: clamp_latitude(latitude),
            longitude: wrap_longitude(longitude),
        });
        self
    }

    pub fn with_timezone(mut self, minutes_east: i32) -> Self {
        self.timezone_override = Some(minutes_east.clamp(MIN_TZ_MINUTES, MAX_TZ_MINUTES));
        self
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self.features = FeatureSet::for_variant(variant);
        self
    }
}

fn parse_number(key: &str, value: &str, problems: &mut Vec<ConfigError>) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            problems.push(ConfigError::NotANumber {
                key: key.to_string(),
                value: value.to_string(),
            });
            None
        }
    }
}

fn clamp_timezone(minutes: f64, problems: &mut Vec<ConfigError>) -> i32 {
    let used = minutes
        .round()
        .clamp(MIN_TZ_MINUTES as f64, MAX_TZ_MINUTES as f64);
    if used != minutes.round() {
        problems.push(ConfigError::OutOfRange {
            key: "tz".into(),
            value: minutes,
            used,
        });
    }
    used as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::astro::MAX_LATITUDE;

    #[test]
    fn empty_query_uses_device_location() {
        let (cfg, problems) = ClockConfig::parse_query("");
        assert!(problems.is_empty());
        assert!(cfg.position.is_none());
        assert_eq!(cfg.variant, Variant::Extended);
        assert_eq!(cfg.features, FeatureSet::EXTENDED);
    }

    #[test]
    fn explicit_coordinates_pin_the_observer() {
        let (cfg, problems) = ClockConfig::parse_query("?lat=33.7490&lon=-84.3880&tz=-300");
        assert!(problems.is_empty());
        let pos = cfg.position.unwrap();
        assert_eq!(pos.latitude, 33.749);
        assert_eq!(pos.longitude, -84.388);
        assert_eq!(cfg.timezone_override, Some(-300));
    }

    #[test]
    fn polar_latitude_is_clamped() {
        let (cfg, problems) = ClockConfig::parse_query("lat=90&lon=0");
        assert_eq!(cfg.position.unwrap().latitude, MAX_LATITUDE);
        assert!(matches!(problems[0], ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn garbage_values_fall_back() {
        let (cfg, problems) = ClockConfig::parse_query("lat=north&lon=5&tz=soon&variant=deluxe");
        assert!(cfg.position.is_none());
        assert!(cfg.timezone_override.is_none());
        assert_eq!(cfg.variant, Variant::Extended);
        // lat, tz, variant, then the dangling lon
        assert_eq!(problems.len(), 4);
        assert_eq!(problems[3], ConfigError::HalfCoordinate);
    }

    #[test]
    fn timezone_clamped_to_real_offsets() {
        let (cfg, problems) = ClockConfig::parse_query("tz=5000");
        assert_eq!(cfg.timezone_override, Some(840));
        assert_eq!(problems.len(), 1);
    }

    #[test]
    fn base_variant_disables_extras() {
        let (cfg, _) = ClockConfig::parse_query("variant=BASE");
        assert_eq!(cfg.features, FeatureSet::BASE);
    }

    #[test]
    fn reserved_parameters_are_kept() {
        let (cfg, problems) = ClockConfig::parse_query("x=1&pov=1&det=hi&unknown=3");
        assert!(problems.is_empty());
        assert_eq!(cfg.reserved.x.as_deref(), Some("1"));
        assert_eq!(cfg.reserved.pov.as_deref(), Some("1"));
        assert_eq!(cfg.reserved.det.as_deref(), Some("hi"));
        assert!(cfg.reserved.rot.is_none());
        // reserved `pov` does not change the starting camera
        assert_eq!(cfg.pov, PovMode::Third);
    }

    #[test]
    fn longitude_is_wrapped() {
        let cfg = ClockConfig::default().with_position(10.0, 200.0);
        assert_eq!(cfg.position.unwrap().longitude, -160.0);
    }
}
