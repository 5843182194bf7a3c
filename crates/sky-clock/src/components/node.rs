use glam::{Quat, Vec3};
use serde::{Serialize, Serializer};

use crate::astro::Planet;

/// Which scene object a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Sun,
    SunLight,
    Moon,
    MoonLight,
    /// Dark hemisphere over the moon that shows the phase.
    MoonCover,
    Satellite,
    /// Tinted directional fill light.
    AmbientLight,
    LampLight,
    Land,
    Clouds,
    Planet(Planet),
}

const FIXED_KINDS: [NodeKind; 10] = [
    NodeKind::Sun,
    NodeKind::SunLight,
    NodeKind::Moon,
    NodeKind::MoonLight,
    NodeKind::MoonCover,
    NodeKind::Satellite,
    NodeKind::AmbientLight,
    NodeKind::LampLight,
    NodeKind::Land,
    NodeKind::Clouds,
];

impl NodeKind {
    /// Number of distinct kinds, planets included.
    pub const COUNT: usize = FIXED_KINDS.len() + Planet::COUNT;

    /// Stable wire index. Planets follow the fixed kinds.
    pub fn index(self) -> u32 {
        match self {
            NodeKind::Planet(p) => (FIXED_KINDS.len() + p.index()) as u32,
            other => FIXED_KINDS
                .iter()
                .position(|k| *k == other)
                .map_or(u32::MAX, |i| i as u32),
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        let index = index as usize;
        if index < FIXED_KINDS.len() {
            Some(FIXED_KINDS[index])
        } else {
            Planet::ALL
                .get(index - FIXED_KINDS.len())
                .map(|p| NodeKind::Planet(*p))
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Sun => "sun",
            NodeKind::SunLight => "sun_light",
            NodeKind::Moon => "moon",
            NodeKind::MoonLight => "moon_light",
            NodeKind::MoonCover => "moon_cover",
            NodeKind::Satellite => "satellite",
            NodeKind::AmbientLight => "ambient_light",
            NodeKind::LampLight => "lamp_light",
            NodeKind::Land => "land",
            NodeKind::Clouds => "clouds",
            NodeKind::Planet(Planet::Mercury) => "mercury",
            NodeKind::Planet(Planet::Venus) => "venus",
            NodeKind::Planet(Planet::Mars) => "mars",
            NodeKind::Planet(Planet::Jupiter) => "jupiter",
            NodeKind::Planet(Planet::Saturn) => "saturn",
            NodeKind::Planet(Planet::Uranus) => "uranus",
            NodeKind::Planet(Planet::Neptune) => "neptune",
            NodeKind::Planet(Planet::Pluto) => "pluto",
        }
    }

    pub fn is_light(self) -> bool {
        matches!(
            self,
            NodeKind::SunLight | NodeKind::MoonLight | NodeKind::AmbientLight | NodeKind::LampLight
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Convert `0xRRGGBB` into `[r, g, b]` in 0..1.
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// Parse a CSS `#rrggbb` color.
pub fn hex_color(css: &str) -> Option<[f32; 3]> {
    let digits = css.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(rgb)
}

/// One row of the scene table.
///
/// The host owns the real object; the node mirrors the fields the clock
/// writes. For meshes `color` is the emissive color, for lights it is the
/// light color. Nodes start absent and become `present` once the host has
/// created (or finished loading) the object.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub kind: NodeKind,
    pub present: bool,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl SceneNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            present: false,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            color: [1.0, 1.0, 1.0],
            intensity: 0.0,
        }
    }

    // -- Builder pattern --

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn present(mut self) -> Self {
        self.present = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_every_kind() {
        for i in 0..NodeKind::COUNT as u32 {
            let kind = NodeKind::from_index(i).unwrap();
            assert_eq!(kind.index(), i);
        }
        assert!(NodeKind::from_index(NodeKind::COUNT as u32).is_none());
    }

    #[test]
    fn planets_follow_fixed_kinds() {
        assert_eq!(NodeKind::Planet(Planet::Mercury).index(), 10);
        assert_eq!(NodeKind::Planet(Planet::Pluto).index(), 17);
    }

    #[test]
    fn tags_are_unique() {
        let mut tags: Vec<_> = (0..NodeKind::COUNT as u32)
            .filter_map(NodeKind::from_index)
            .map(NodeKind::tag)
            .collect();
        tags.sort();
        tags.dedup();
        assert_eq!(tags.len(), NodeKind::COUNT);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(rgb(0xFF0000), [1.0, 0.0, 0.0]);
        assert_eq!(rgb(0x000000), [0.0, 0.0, 0.0]);
        let c = rgb(0xFFBB77);
        assert!((c[1] - 187.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn parses_css_hex() {
        assert_eq!(hex_color("#ff0000"), Some([1.0, 0.0, 0.0]));
        assert_eq!(hex_color("ff0000"), None);
        assert_eq!(hex_color("#fff"), None);
        assert_eq!(hex_color("#gg0000"), None);
    }

    #[test]
    fn new_node_is_absent() {
        let node = SceneNode::new(NodeKind::Sun);
        assert!(!node.present);
        assert!(node.with_intensity(5.0).present().present);
    }

    #[test]
    fn serializes_as_tag() {
        let json = serde_json::to_string(&NodeKind::Planet(Planet::Venus)).unwrap();
        assert_eq!(json, "\"venus\"");
    }
}
