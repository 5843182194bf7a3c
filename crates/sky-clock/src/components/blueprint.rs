//! Description of every object the host has to build before the clock can
//! drive it. Serialized once and handed to the JS side.

use serde::Serialize;

use crate::api::config::FeatureSet;
use crate::astro::Planet;
use crate::components::node::NodeKind;

/// Geometry of a node's mesh.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MeshShape {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
        /// Partial sphere start angle, for the moon cover.
        #[serde(skip_serializing_if = "Option::is_none")]
        phi_start: Option<f32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        phi_length: Option<f32>,
    },
    /// glTF asset loaded by the host. `offset` is applied to every mesh in it.
    Model { asset: &'static str, offset: [f32; 3] },
}

impl MeshShape {
    fn sphere(radius: f32, segments: u32) -> Self {
        MeshShape::Sphere {
            radius,
            width_segments: segments,
            height_segments: segments,
            phi_start: None,
            phi_length: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    Lambert,
    Basic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSpec {
    pub shape: MeshShape,
    pub material: MaterialKind,
    pub color: Option<&'static str>,
    pub emissive: Option<&'static str>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightSpec {
    Directional {
        color: &'static str,
        intensity: f32,
        cast_shadow: bool,
        shadow_bias: f32,
        shadow_map_size: u32,
    },
    Point {
        color: &'static str,
        intensity: f32,
        distance: f32,
        decay: f32,
    },
}

/// One object to create. A node with a `parent` is added as a child of the
/// parent's object, so its transform is local to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSpec {
    pub kind: NodeKind,
    pub parent: Option<NodeKind>,
    pub mesh: Option<MeshSpec>,
    pub light: Option<LightSpec>,
    pub position: [f32; 3],
    pub scale: f32,
}

impl NodeSpec {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            mesh: None,
            light: None,
            position: [0.0; 3],
            scale: 1.0,
        }
    }

    fn child_of(mut self, parent: NodeKind) -> Self {
        self.parent = Some(parent);
        self
    }

    fn mesh(mut self, mesh: MeshSpec) -> Self {
        self.mesh = Some(mesh);
        self
    }

    fn light(mut self, light: LightSpec) -> Self {
        self.light = Some(light);
        self
    }

    fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    fn scaled(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

const SHADOW_BIAS: f32 = -0.0002;
const SHADOW_MAP_SIZE: u32 = 1400;

fn unlit_sphere(radius: f32, segments: u32, material: MaterialKind) -> MeshSpec {
    MeshSpec {
        shape: MeshShape::sphere(radius, segments),
        material,
        color: None,
        emissive: None,
        cast_shadow: false,
        receive_shadow: false,
    }
}

fn shadow_light(color: &'static str, intensity: f32) -> LightSpec {
    LightSpec::Directional {
        color,
        intensity,
        cast_shadow: true,
        shadow_bias: SHADOW_BIAS,
        shadow_map_size: SHADOW_MAP_SIZE,
    }
}

fn model(asset: &'static str, offset: [f32; 3]) -> MeshSpec {
    MeshSpec {
        shape: MeshShape::Model { asset, offset },
        material: MaterialKind::Lambert,
        color: None,
        emissive: None,
        cast_shadow: true,
        receive_shadow: true,
    }
}

/// Planet sphere radius plus base and emissive colors.
fn planet_look(planet: Planet) -> (f32, &'static str, &'static str) {
    match planet {
        Planet::Mercury => (0.008, "#f8ffa8", "#f8ffa8"),
        Planet::Venus => (0.024, "#f5f7a1", "#f5f781"),
        Planet::Mars => (0.016, "#e3a184", "#e36124"),
        Planet::Jupiter => (0.020, "#f0dabf", "#b0aa8f"),
        Planet::Saturn => (0.014, "#f7c4a7", "#c7a477"),
        Planet::Uranus => (0.01, "#a2e8f7", "#72e8f7"),
        Planet::Neptune => (0.007, "#aeb8f7", "#5e78f7"),
        Planet::Pluto => (0.005, "#d9d3d1", "#696361"),
    }
}

/// Full scene description for a feature set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneBlueprint {
    pub background: &'static str,
    /// Flat ambient light, never animated.
    pub base_ambient: &'static str,
    pub shadow_maps: bool,
    pub nodes: Vec<NodeSpec>,
}

impl SceneBlueprint {
    pub fn for_features(features: &FeatureSet) -> Self {
        let mut nodes = Vec::with_capacity(NodeKind::COUNT);

        nodes.push(
            NodeSpec::new(NodeKind::AmbientLight)
                .light(LightSpec::Directional {
                    color: "#335599",
                    intensity: 0.3,
                    cast_shadow: false,
                    shadow_bias: 0.0,
                    shadow_map_size: 0,
                })
                .at([-40.0, 10.0, 20.0]),
        );

        let mut sun = unlit_sphere(0.15, 10, MaterialKind::Lambert);
        sun.emissive = Some("#ffbb77");
        nodes.push(NodeSpec::new(NodeKind::Sun).mesh(sun));
        nodes.push(
            NodeSpec::new(NodeKind::SunLight)
                .child_of(NodeKind::Sun)
                .light(shadow_light("#775533", 5.0)),
        );

        let mut moon = unlit_sphere(0.16, 40, MaterialKind::Basic);
        moon.emissive = Some("#9999cc");
        nodes.push(NodeSpec::new(NodeKind::Moon).mesh(moon));
        nodes.push(
            NodeSpec::new(NodeKind::MoonLight)
                .child_of(NodeKind::Moon)
                .light(shadow_light("#444499", 0.0)),
        );
        nodes.push(
            NodeSpec::new(NodeKind::MoonCover)
                .child_of(NodeKind::Moon)
                .mesh(MeshSpec {
                    shape: MeshShape::Sphere {
                        radius: 0.165,
                        width_segments: 40,
                        height_segments: 20,
                        phi_start: Some(std::f32::consts::PI),
                        phi_length: Some(std::f32::consts::PI),
                    },
                    material: MaterialKind::Basic,
                    color: Some("#000000"),
                    emissive: None,
                    cast_shadow: false,
                    receive_shadow: false,
                }),
        );

        if features.planets {
            for planet in Planet::ALL {
                let (radius, color, emissive) = planet_look(planet);
                let mut mesh = unlit_sphere(radius, 10, MaterialKind::Lambert);
                mesh.color = Some(color);
                mesh.emissive = Some(emissive);
                nodes.push(NodeSpec::new(NodeKind::Planet(planet)).mesh(mesh));
            }
        }

        if features.satellite {
            let mut marker = unlit_sphere(0.01, 10, MaterialKind::Lambert);
            marker.color = Some("#212636");
            marker.emissive = Some("#ff0000");
            nodes.push(NodeSpec::new(NodeKind::Satellite).mesh(marker));
        }

        nodes.push(NodeSpec::new(NodeKind::Land).mesh(model("land.glb", [0.0, -1.0, 0.0])));
        nodes.push(
            NodeSpec::new(NodeKind::Clouds)
                .mesh(model("clouds.glb", [-3.5, 8.0, -2.5]))
                .scaled(0.3),
        );

        let mut lamp = unlit_sphere(0.02, 1, MaterialKind::Lambert);
        lamp.color = Some("#000000");
        nodes.push(
            NodeSpec::new(NodeKind::LampLight)
                .mesh(lamp)
                .light(LightSpec::Point {
                    color: "#ff5500",
                    intensity: 5.0,
                    distance: 0.8,
                    decay: 1.0,
                })
                .at([-0.63, 0.15, 0.35]),
        );

        Self {
            background: "#000000",
            base_ambient: "#222222",
            shadow_maps: true,
            nodes,
        }
    }

    pub fn get(&self, kind: NodeKind) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.kind == kind)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
