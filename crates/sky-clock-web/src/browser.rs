//! Browser implementation of the clock's host traits.

use log::{debug, trace, warn};
use sky_clock::api::host::{
    Environment, FrameScheduler, LocationFix, LocationSource, SatelliteQuery, SatelliteSource,
};
use sky_clock::{Frame, FrameBuffer, Renderer, TickHandle, Ticket, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{GeolocationPosition, Window};

use crate::tracking;

/// Issues tick handles. A replacement host continues the previous host's
/// sequence, so a callback the old host already queued can never carry a
/// handle the new clock is waiting for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandleCounter {
    last: u32,
}

impl HandleCounter {
    pub fn after(last: u32) -> Self {
        Self { last }
    }

    pub fn next(&mut self) -> TickHandle {
        self.last = self.last.wrapping_add(1);
        TickHandle(self.last)
    }

    pub fn last(&self) -> u32 {
        self.last
    }
}

pub struct WebHost {
    window: Window,
    handles: HandleCounter,
    /// Timer of the one tick that can be pending.
    pending_timeout: Option<(TickHandle, i32)>,
    frame: FrameBuffer,
    overlay_json: String,
    effects_json: String,
    effects_generation: Option<u32>,
}

impl WebHost {
    pub fn new(window: Window, handles: HandleCounter) -> Self {
        Self {
            window,
            handles,
            pending_timeout: None,
            frame: FrameBuffer::new(),
            overlay_json: String::from("[]"),
            effects_json: String::from("{}"),
            effects_generation: None,
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn handles(&self) -> HandleCounter {
        self.handles
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn overlay_json(&self) -> &str {
        &self.overlay_json
    }

    pub fn effects_json(&self) -> &str {
        &self.effects_json
    }
}

impl Environment for WebHost {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    fn local_offset_minutes(&self, at_ms: f64) -> i32 {
        // JS reports minutes west of UTC.
        let west = js_sys::Date::new(&JsValue::from_f64(at_ms)).get_timezone_offset();
        if west.is_finite() {
            -(west.round() as i32)
        } else {
            0
        }
    }

    fn viewport(&self) -> Viewport {
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
        let fallback = Viewport::default();
        Viewport::new(
            read(self.window.inner_width()).map_or(fallback.width, |w| w as f32),
            read(self.window.inner_height()).map_or(fallback.height, |h| h as f32),
        )
    }
}

impl FrameScheduler for WebHost {
    /// Wait `delay_ms`, then the next animation frame, then tick.
    fn schedule(&mut self, delay_ms: u32) -> TickHandle {
        let handle = self.handles.next();

        let window = self.window.clone();
        let on_timeout = Closure::once_into_js(move || {
            let on_frame = Closure::once_into_js(move |_ts: f64| crate::run_tick(handle));
            if let Err(e) = window.request_animation_frame(on_frame.unchecked_ref()) {
                warn!("requestAnimationFrame failed: {:?}", e);
            }
        });

        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            on_timeout.unchecked_ref(),
            delay_ms.min(i32::MAX as u32) as i32,
        ) {
            Ok(id) => self.pending_timeout = Some((handle, id)),
            Err(e) => warn!("setTimeout failed: {:?}", e),
        }
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some((pending, id)) = self.pending_timeout {
            if pending == handle {
                self.window.clear_timeout_with_handle(id);
                self.pending_timeout = None;
            }
        }
    }
}

impl LocationSource for WebHost {
    fn request_location(&mut self, ticket: Ticket) {
        let geolocation = match self.window.navigator().geolocation() {
            Ok(g) => g,
            Err(e) => {
                trace!("geolocation unavailable: {:?}", e);
                return;
            }
        };
        let on_fix = Closure::once_into_js(move |pos: GeolocationPosition| {
            let coords = pos.coords();
            let fix = LocationFix {
                latitude: coords.latitude(),
                longitude: coords.longitude(),
            };
            crate::with_runner(|r| r.clock.post_location(ticket, fix));
        });
        if let Err(e) = geolocation.get_current_position(on_fix.unchecked_ref()) {
            trace!("getCurrentPosition failed: {:?}", e);
        }
    }
}

impl SatelliteSource for WebHost {
    fn request_satellite(&mut self, ticket: Ticket, query: SatelliteQuery) {
        // The API only reports the current position; the query is informational.
        trace!("satellite #{} for ({}, {})", ticket.seq, query.latitude, query.longitude);
        tracking::spawn_lookup(ticket);
    }
}

impl Renderer for WebHost {
    fn render(&mut self, frame: &Frame<'_>) {
        self.frame.write(frame);
        match frame.overlay.to_json() {
            Ok(json) => self.overlay_json = json,
            Err(e) => warn!("overlay serialization failed: {}", e),
        }
        let generation = frame.effects.generation();
        if self.effects_generation != Some(generation) {
            match frame.effects.to_json() {
                Ok(json) => {
                    self.effects_json = json;
                    self.effects_generation = Some(generation);
                }
                Err(e) => warn!("effects serialization failed: {}", e),
            }
        }
    }

    fn resize(&mut self, viewport: Viewport) {
        debug!("viewport {}x{}", viewport.width, viewport.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_counter_starts_at_one() {
        let mut handles = HandleCounter::default();
        assert_eq!(handles.next(), TickHandle(1));
        assert_eq!(handles.next(), TickHandle(2));
        assert_eq!(handles.last(), 2);
    }

    #[test]
    fn replacement_counter_never_reissues_old_handles() {
        let mut old = HandleCounter::default();
        let queued: Vec<TickHandle> = (0..3).map(|_| old.next()).collect();

        let mut replacement = HandleCounter::after(old.last());
        let first = replacement.next();
        assert_eq!(first, TickHandle(4));
        assert!(!queued.contains(&first));
    }
}
