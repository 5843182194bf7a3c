use thiserror::Error;

/// A query parameter that could not be used as given.
///
/// Configuration errors are never fatal: the offending value is replaced by
/// its default or clamped, and the error is logged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("parameter `{key}` is not a number: {value:?}")]
    NotANumber { key: String, value: String },

    #[error("parameter `{key}` out of range ({value}), using {used}")]
    OutOfRange { key: String, value: f64, used: f64 },

    #[error("parameter `{key}` has unknown value {value:?}")]
    UnknownValue { key: String, value: String },

    #[error("only one of `lat`/`lon` given; falling back to device location")]
    HalfCoordinate,
}

/// Failure of an asynchronous satellite or location lookup.
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("lookup failed: {0}")]
    Unavailable(String),

    #[error("malformed tracking payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Failure to bring a scene asset into the scene.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("asset for {node} failed to load: {reason}")]
pub struct AssetError {
    pub node: String,
    pub reason: String,
}
