//! Renderer contract.
//!
//! The clock never draws. After each tick it hands a [`Frame`] to the host,
//! which mirrors the node table into its real scene (three.js in the
//! browser) and runs the effect passes once.

use super::camera::CameraRig;
use super::effects::EffectsPipeline;
use crate::api::types::Viewport;
use crate::core::scene::SceneGraph;
use crate::systems::overlay::Overlay;

pub trait Renderer {
    /// Draw one frame: base pass plus the configured effect passes.
    fn render(&mut self, frame: &Frame<'_>);

    /// Viewport changed. Resize targets; never rebuild the scene.
    fn resize(&mut self, viewport: Viewport);
}

/// Everything the host needs to draw one tick.
pub struct Frame<'a> {
    pub scene: &'a SceneGraph,
    pub camera: &'a CameraRig,
    pub effects: &'a EffectsPipeline,
    pub overlay: &'a Overlay,
    /// Ticks rendered so far, this one included.
    pub frame_index: u64,
    /// Orbit controls must snap back to the rig (POV just changed).
    pub camera_reset: bool,
}
