//! Contracts the clock needs from whatever is hosting it.
//!
//! The browser bridge implements all of them on one struct; tests use a
//! recording mock. Asynchronous lookups are fire-and-forget: the host answers
//! later by posting the result (tagged with the same [`Ticket`]) back into the
//! clock, which applies it at the start of its next tick.

use crate::api::types::{TickHandle, Ticket, Viewport};
use crate::renderer::traits::Renderer;

/// Wall clock, time zone and viewport.
pub trait Environment {
    /// Current instant, Unix milliseconds.
    fn now_ms(&self) -> f64;

    /// Device UTC offset in minutes east of UTC at `at_ms`.
    fn local_offset_minutes(&self, at_ms: f64) -> i32;

    fn viewport(&self) -> Viewport;
}

/// One-shot timed callbacks.
///
/// `schedule` arranges for the clock's tick to be invoked with the returned
/// handle after at least `delay_ms`. Cancelling is best-effort: the clock also
/// ignores ticks whose handle it no longer expects.
pub trait FrameScheduler {
    fn schedule(&mut self, delay_ms: u32) -> TickHandle;
    fn cancel(&mut self, handle: TickHandle);
}

/// A device location reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
}

/// Device geolocation.
pub trait LocationSource {
    fn request_location(&mut self, ticket: Ticket);
}

/// Parameters of one satellite lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatelliteQuery {
    pub at_ms: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Third-party satellite tracking.
pub trait SatelliteSource {
    fn request_satellite(&mut self, ticket: Ticket, query: SatelliteQuery);
}

/// Everything a [`SkyClock`](crate::SkyClock) tick talks to.
pub trait ClockHost: Environment + FrameScheduler + LocationSource + SatelliteSource + Renderer {}

impl<T> ClockHost for T where
    T: Environment + FrameScheduler + LocationSource + SatelliteSource + Renderer
{
}
