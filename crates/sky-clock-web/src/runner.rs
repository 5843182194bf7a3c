use log::warn;
use sky_clock::{ClockConfig, NodeKind, OverlayId, SkyClock, TickHandle, Viewport};
use sky_clock::api::host::Environment;
use web_sys::Window;

use crate::browser::{HandleCounter, WebHost};

/// Owns the clock and its browser host.
///
/// Lives in a `thread_local!` in the crate root, because wasm-bindgen
/// cannot export the clock directly and browser callbacks need to reach it.
pub struct ClockRunner {
    pub clock: SkyClock,
    pub host: WebHost,
}

impl ClockRunner {
    /// `handles` continues the tick handle sequence of any runner this one replaces.
    pub fn new(config: ClockConfig, window: Window, handles: HandleCounter) -> Self {
        let host = WebHost::new(window, handles);
        let clock = SkyClock::new(config, host.now_ms());
        Self { clock, host }
    }

    /// Call once after construction.
    pub fn init(&mut self) {
        self.clock.init(&mut self.host);
    }

    /// Run one tick. Returns whether a frame was rendered.
    pub fn tick(&mut self, handle: TickHandle) -> bool {
        self.clock.on_tick(handle, &mut self.host)
    }

    pub fn start(&mut self) -> bool {
        self.clock.start(&mut self.host)
    }

    pub fn stop(&mut self) -> bool {
        self.clock.stop(&mut self.host)
    }

    pub fn resize(&mut self) {
        let viewport: Viewport = self.host.viewport();
        self.clock.resize(viewport, &mut self.host);
    }

    pub fn attach(&mut self, kind: u32) -> bool {
        match NodeKind::from_index(kind) {
            Some(kind) => self.clock.attach(kind),
            None => {
                warn!("unknown node kind {}", kind);
                false
            }
        }
    }

    pub fn detach(&mut self, kind: u32) -> bool {
        NodeKind::from_index(kind).is_some_and(|kind| self.clock.detach(kind))
    }

    pub fn asset_failed(&mut self, kind: u32, message: &str) {
        match NodeKind::from_index(kind) {
            Some(kind) => {
                self.clock.asset_failed(kind, message);
            }
            None => warn!("asset failure for unknown node kind {}: {}", kind, message),
        }
    }

    pub fn overlay_measured(&mut self, id: u32, width: f32, height: f32) {
        if let Some(id) = OverlayId::from_index(id) {
            self.clock.measure_overlay(id, width, height);
        }
    }

    // ---- Frame accessors, read by JS after each tick ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.host.frame().ptr()
    }

    pub fn frame_len(&self) -> u32 {
        self.host.frame().len() as u32
    }

    pub fn overlay_json(&self) -> String {
        self.host.overlay_json().to_string()
    }

    pub fn effects_json(&self) -> String {
        self.host.effects_json().to_string()
    }

    pub fn camera_json(&self) -> String {
        self.clock.camera().to_json().unwrap_or_else(|e| {
            warn!("camera serialization failed: {}", e);
            String::from("{}")
        })
    }

    pub fn blueprint_json(&self) -> String {
        self.clock.blueprint().to_json().unwrap_or_else(|e| {
            warn!("blueprint serialization failed: {}", e);
            String::from("{}")
        })
    }
}
