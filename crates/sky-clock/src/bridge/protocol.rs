/// Frame buffer layout shared with the JS renderer.
/// Must stay in sync with `protocol.js` in the web package.
///
/// Layout (all values f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Nodes: node_count × 16 floats]
/// ```
///
/// The buffer lives in WASM memory; JS reads it through a view on
/// `memory.buffer` at `clock_frame_ptr()` after every tick.

use bytemuck::{Pod, Zeroable};

use crate::api::types::PovMode;
use crate::components::node::SceneNode;
use crate::renderer::traits::Frame;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_INDEX: usize = 1;
pub const HEADER_NODE_COUNT: usize = 2;
pub const HEADER_VIEWPORT_WIDTH: usize = 3;
pub const HEADER_VIEWPORT_HEIGHT: usize = 4;
pub const HEADER_CAMERA_POSITION: usize = 5;
pub const HEADER_CAMERA_TARGET: usize = 8;
pub const HEADER_CAMERA_MIN_DISTANCE: usize = 11;
pub const HEADER_CAMERA_MAX_DISTANCE: usize = 12;
pub const HEADER_CAMERA_RESET: usize = 13;
pub const HEADER_POV: usize = 14;
pub const HEADER_EFFECTS_GENERATION: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// One scene node on the wire. 16 floats = 64 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct NodeRecord {
    pub kind: f32,
    pub present: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub qx: f32,
    pub qy: f32,
    pub qz: f32,
    pub qw: f32,
    pub scale: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl NodeRecord {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_node(node: &SceneNode) -> Self {
        Self {
            kind: node.kind.index() as f32,
            present: if node.present { 1.0 } else { 0.0 },
            x: node.position.x,
            y: node.position.y,
            z: node.position.z,
            qx: node.rotation.x,
            qy: node.rotation.y,
            qz: node.rotation.z,
            qw: node.rotation.w,
            scale: node.scale.x,
            r: node.color[0],
            g: node.color[1],
            b: node.color[2],
            intensity: node.intensity,
            _pad0: 0.0,
            _pad1: 0.0,
        }
    }
}

/// Flat f32 buffer rewritten after every tick.
pub struct FrameBuffer {
    data: Vec<f32>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::with_capacity(crate::components::node::NodeKind::COUNT)
    }

    pub fn with_capacity(max_nodes: usize) -> Self {
        Self {
            data: Vec::with_capacity(HEADER_FLOATS + max_nodes * NodeRecord::FLOATS),
        }
    }

    pub fn write(&mut self, frame: &Frame<'_>) {
        let viewport = frame.effects.viewport();
        let camera = frame.camera;

        let mut header = [0.0f32; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_INDEX] = frame.frame_index as f32;
        header[HEADER_NODE_COUNT] = frame.scene.len() as f32;
        header[HEADER_VIEWPORT_WIDTH] = viewport.width;
        header[HEADER_VIEWPORT_HEIGHT] = viewport.height;
        header[HEADER_CAMERA_POSITION..HEADER_CAMERA_POSITION + 3]
            .copy_from_slice(&camera.position.to_array());
        header[HEADER_CAMERA_TARGET..HEADER_CAMERA_TARGET + 3]
            .copy_from_slice(&camera.target.to_array());
        header[HEADER_CAMERA_MIN_DISTANCE] = camera.min_distance;
        header[HEADER_CAMERA_MAX_DISTANCE] = camera.max_distance;
        header[HEADER_CAMERA_RESET] = if frame.camera_reset { 1.0 } else { 0.0 };
        header[HEADER_POV] = match camera.pov {
            PovMode::First => 1.0,
            PovMode::Third => 3.0,
        };
        header[HEADER_EFFECTS_GENERATION] = frame.effects.generation() as f32;

        self.data.clear();
        self.data.extend_from_slice(&header);
        for node in frame.scene.iter() {
            let record = NodeRecord::from_node(node);
            self.data.extend_from_slice(bytemuck::cast_slice(&[record]));
        }
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    /// Length in floats.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
