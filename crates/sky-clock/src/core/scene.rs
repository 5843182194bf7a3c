use crate::components::blueprint::{LightSpec, NodeSpec, SceneBlueprint};
use crate::components::node::{hex_color, NodeKind, SceneNode};

/// Flat node table built from a [`SceneBlueprint`].
/// Small and fixed-size, so lookups are linear scans.
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(NodeKind::COUNT),
        }
    }

    /// One absent node per blueprint entry, seeded with its fixed transform
    /// and initial color.
    pub fn from_blueprint(blueprint: &SceneBlueprint) -> Self {
        let nodes = blueprint.nodes.iter().map(seed_node).collect();
        Self { nodes }
    }

    /// Mark a node as backed by a real host object.
    /// Returns false if the blueprint never declared it.
    pub fn attach(&mut self, kind: NodeKind) -> bool {
        match self.get_mut(kind) {
            Some(node) => {
                node.present = true;
                true
            }
            None => false,
        }
    }

    pub fn detach(&mut self, kind: NodeKind) -> bool {
        match self.get_mut(kind) {
            Some(node) => {
                let was = node.present;
                node.present = false;
                was
            }
            None => false,
        }
    }

    pub fn get(&self, kind: NodeKind) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.kind == kind)
    }

    pub fn get_mut(&mut self, kind: NodeKind) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.kind == kind)
    }

    /// Mutable access only when the host object exists.
    pub fn present_mut(&mut self, kind: NodeKind) -> Option<&mut SceneNode> {
        self.get_mut(kind).filter(|n| n.present)
    }

    /// Run `f` on a present node. Absent or undeclared nodes are skipped.
    pub fn update<F: FnOnce(&mut SceneNode)>(&mut self, kind: NodeKind, f: F) -> bool {
        match self.present_mut(kind) {
            Some(node) => {
                f(node);
                true
            }
            None => false,
        }
    }

    pub fn is_present(&self, kind: NodeKind) -> bool {
        self.get(kind).is_some_and(|n| n.present)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Lights seed from their light color; meshes from emissive, then base color.
fn seed_node(spec: &NodeSpec) -> SceneNode {
    let (color, intensity) = match &spec.light {
        Some(LightSpec::Directional {
            color, intensity, ..
        })
        | Some(LightSpec::Point {
            color, intensity, ..
        }) => (Some(*color), *intensity),
        None => {
            let mesh_color = spec.mesh.as_ref().and_then(|m| m.emissive.or(m.color));
            (mesh_color, 1.0)
        }
    };
    SceneNode::new(spec.kind)
        .with_position(spec.position.into())
        .with_scale(spec.scale)
        .with_color(color.and_then(hex_color).unwrap_or([0.0, 0.0, 0.0]))
        .with_intensity(intensity)
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
