//! WASM bridge: wires [`SkyClock`](sky_clock::SkyClock) to the browser.
//!
//! JS creates the three.js scene from `clock_scene_blueprint()`, reports each
//! object with `clock_attach()`, then calls `clock_start()`. After every tick
//! the render hook passed to `clock_init` is called; it reads the frame
//! buffer and overlay JSON and draws.

use std::cell::RefCell;

use log::{info, warn};
use sky_clock::ClockConfig;
use sky_clock::TickHandle;
use wasm_bindgen::prelude::*;

mod browser;
mod runner;
pub mod tracking;

pub use browser::{HandleCounter, WebHost};
pub use runner::ClockRunner;

thread_local! {
    static RUNNER: RefCell<Option<ClockRunner>> = const { RefCell::new(None) };
    static RENDER_HOOK: RefCell<Option<js_sys::Function>> = const { RefCell::new(None) };
}

/// Run `f` on the runner. `None` before `clock_init`, or if the runner is
/// already borrowed further up the stack.
pub(crate) fn with_runner<R>(f: impl FnOnce(&mut ClockRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.try_borrow_mut().ok()?;
        borrow.as_mut().map(f)
    })
}

/// Timer entry point. The render hook runs after the runner borrow ends so
/// it can call back into the accessors.
pub(crate) fn run_tick(handle: TickHandle) {
    if with_runner(|r| r.tick(handle)).unwrap_or(false) {
        let hook = RENDER_HOOK.with(|h| h.borrow().clone());
        if let Some(hook) = hook {
            if let Err(e) = hook.call0(&JsValue::NULL) {
                warn!("render hook threw: {:?}", e);
            }
        }
    }
}

fn install(config: ClockConfig, render_hook: js_sys::Function) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let Some(window) = web_sys::window() else {
        warn!("no window; sky clock not started");
        return;
    };

    let handles = match RUNNER.with(|cell| cell.borrow_mut().take()) {
        Some(mut old) => {
            old.stop();
            old.host.handles()
        }
        None => HandleCounter::default(),
    };
    let mut runner = ClockRunner::new(config, window, handles);
    runner.init();

    RENDER_HOOK.with(|h| *h.borrow_mut() = Some(render_hook));
    RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
    info!("sky-clock: initialized");
}

/// Initialize from the page's own query string.
#[wasm_bindgen]
pub fn clock_init(render_hook: js_sys::Function) {
    let query = web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    install(ClockConfig::from_query(&query), render_hook);
}

#[wasm_bindgen]
pub fn clock_init_with_query(query: &str, render_hook: js_sys::Function) {
    install(ClockConfig::from_query(query), render_hook);
}

#[wasm_bindgen]
pub fn clock_scene_blueprint() -> String {
    with_runner(|r| r.blueprint_json()).unwrap_or_else(|| String::from("{}"))
}

#[wasm_bindgen]
pub fn clock_attach(kind: u32) -> bool {
    with_runner(|r| r.attach(kind)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn clock_detach(kind: u32) -> bool {
    with_runner(|r| r.detach(kind)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn clock_asset_failed(kind: u32, message: &str) {
    with_runner(|r| r.asset_failed(kind, message));
}

#[wasm_bindgen]
pub fn clock_start() -> bool {
    with_runner(|r| r.start()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn clock_stop() -> bool {
    with_runner(|r| r.stop()).unwrap_or(false)
}

/// Returns the new frame delay in ms.
#[wasm_bindgen]
pub fn clock_toggle_fps() -> u32 {
    with_runner(|r| r.clock.toggle_frame_rate().delay_ms()).unwrap_or(0)
}

/// Returns 1 or 3.
#[wasm_bindgen]
pub fn clock_toggle_pov() -> u32 {
    with_runner(|r| match r.clock.toggle_pov() {
        sky_clock::PovMode::First => 1,
        sky_clock::PovMode::Third => 3,
    })
    .unwrap_or(0)
}

#[wasm_bindgen]
pub fn clock_resize() {
    with_runner(|r| r.resize());
}

#[wasm_bindgen]
pub fn clock_overlay_measured(id: u32, width: f32, height: f32) {
    with_runner(|r| r.overlay_measured(id, width, height));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn clock_frame_ptr() -> *const f32 {
    with_runner(|r| r.frame_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn clock_frame_len() -> u32 {
    with_runner(|r| r.frame_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn clock_overlay_json() -> String {
    with_runner(|r| r.overlay_json()).unwrap_or_else(|| String::from("[]"))
}

#[wasm_bindgen]
pub fn clock_effects_json() -> String {
    with_runner(|r| r.effects_json()).unwrap_or_else(|| String::from("{}"))
}

#[wasm_bindgen]
pub fn clock_camera_json() -> String {
    with_runner(|r| r.camera_json()).unwrap_or_else(|| String::from("{}"))
}
