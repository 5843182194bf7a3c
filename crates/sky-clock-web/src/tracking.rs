//! Satellite position lookups against the public wheretheiss.at API.

use log::debug;
use sky_clock::{SatelliteFix, Ticket, TrackingError};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// ISS (NORAD 25544).
pub const ISS_URL: &str = "https://api.wheretheiss.at/v1/satellites/25544";

/// Parse a tracking payload. Only latitude, longitude and altitude are read.
pub fn parse_fix(body: &str) -> Result<SatelliteFix, TrackingError> {
    Ok(serde_json::from_str(body)?)
}

fn unavailable(what: &str, err: impl std::fmt::Debug) -> TrackingError {
    TrackingError::Unavailable(format!("{what}: {err:?}"))
}

async fn fetch_fix(url: &str) -> Result<SatelliteFix, TrackingError> {
    let window = web_sys::window().ok_or_else(|| unavailable("window", "none"))?;
    let resp_value = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| unavailable("fetch", e))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|e| unavailable("not a Response", e))?;
    if !resp.ok() {
        return Err(TrackingError::Unavailable(format!("HTTP {}", resp.status())));
    }
    let text = JsFuture::from(resp.text().map_err(|e| unavailable("body", e))?)
        .await
        .map_err(|e| unavailable("body", e))?;
    let body = text
        .as_string()
        .ok_or_else(|| unavailable("body", "not a string"))?;
    parse_fix(&body)
}

/// Fire-and-forget lookup. The result is posted back under `ticket`; failures
/// are logged and the marker keeps its previous position.
pub fn spawn_lookup(ticket: Ticket) {
    wasm_bindgen_futures::spawn_local(async move {
        match fetch_fix(ISS_URL).await {
            Ok(fix) => {
                crate::with_runner(|r| r.clock.post_satellite(ticket, fix));
            }
            Err(e) => debug!("satellite #{}: {}", ticket.seq, e),
        }
    });
}
