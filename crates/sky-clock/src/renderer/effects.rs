//! Post-processing chain: base render, god rays, SMAA.
//!
//! Built once. Resizing rewrites buffer sizes in place and bumps the
//! generation so the host knows to resize its own targets.

use serde::Serialize;

use crate::api::config::FeatureSet;
use crate::api::types::Viewport;
use crate::astro::Planet;
use crate::components::node::NodeKind;

pub const SUN_RAY_SCALE: f32 = 0.7;
pub const MINOR_RAY_SCALE: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GodRaySource {
    pub source: NodeKind,
    pub resolution_scale: f32,
    pub density: f32,
    pub decay: f32,
    pub weight: f32,
    pub samples: u32,
    /// Derived from the viewport and `resolution_scale`.
    pub width: u32,
    pub height: u32,
}

impl GodRaySource {
    fn new(source: NodeKind, resolution_scale: f32) -> Self {
        Self {
            source,
            resolution_scale,
            density: 0.5,
            decay: 0.9,
            weight: 0.9,
            samples: 10,
            width: 0,
            height: 0,
        }
    }

    fn fit(&mut self, viewport: Viewport) {
        self.width = ((viewport.width * self.resolution_scale).round() as u32).max(1);
        self.height = ((viewport.height * self.resolution_scale).round() as u32).max(1);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Pass {
    Render,
    GodRays { sources: Vec<GodRaySource> },
    Smaa,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectsPipeline {
    passes: Vec<Pass>,
    viewport: Viewport,
    generation: u32,
}

impl EffectsPipeline {
    pub fn new(features: &FeatureSet, viewport: Viewport) -> Self {
        let mut sources = vec![GodRaySource::new(NodeKind::Sun, SUN_RAY_SCALE)];
        if features.planets {
            sources.extend(
                Planet::ALL
                    .iter()
                    .map(|&p| GodRaySource::new(NodeKind::Planet(p), MINOR_RAY_SCALE)),
            );
        }
        if features.satellite {
            sources.push(GodRaySource::new(NodeKind::Satellite, MINOR_RAY_SCALE));
        }

        let mut pipeline = Self {
            passes: vec![Pass::Render, Pass::GodRays { sources }, Pass::Smaa],
            viewport,
            generation: 0,
        };
        pipeline.fit();
        pipeline
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.fit();
        self.generation = self.generation.wrapping_add(1);
    }

    fn fit(&mut self) {
        let viewport = self.viewport;
        for pass in &mut self.passes {
            if let Pass::GodRays { sources } = pass {
                sources.iter_mut().for_each(|s| s.fit(viewport));
            }
        }
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    pub fn god_ray_sources(&self) -> impl Iterator<Item = &GodRaySource> {
        self.passes.iter().flat_map(|p| match p {
            Pass::GodRays { sources } => sources.as_slice(),
            _ => &[][..],
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_has_only_sun_rays() {
        let fx = EffectsPipeline::new(&FeatureSet::BASE, Viewport::new(1000.0, 500.0));
        let sources: Vec<_> = fx.god_ray_sources().collect();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source, NodeKind::Sun);
        assert_eq!((sources[0].width, sources[0].height), (700, 350));
    }

    #[test]
    fn extended_adds_planets_and_satellite() {
        let fx = EffectsPipeline::new(&FeatureSet::EXTENDED, Viewport::new(1000.0, 500.0));
        assert_eq!(fx.god_ray_sources().count(), 1 + Planet::COUNT + 1);
        let sat = fx
            .god_ray_sources()
            .find(|s| s.source == NodeKind::Satellite)
            .unwrap();
        assert_eq!(sat.resolution_scale, MINOR_RAY_SCALE);
        assert_eq!(sat.samples, 10);
        assert_eq!(fx.passes().len(), 3);
        assert_eq!(fx.passes()[2], Pass::Smaa);
    }

    #[test]
    fn resize_updates_in_place() {
        let mut fx = EffectsPipeline::new(&FeatureSet::BASE, Viewport::new(1000.0, 500.0));
        fx.resize(Viewport::new(1000.0, 500.0));
        assert_eq!(fx.generation(), 0);

        fx.resize(Viewport::new(400.0, 800.0));
        assert_eq!(fx.generation(), 1);
        let sun = fx.god_ray_sources().next().unwrap();
        assert_eq!((sun.width, sun.height), (280, 560));
    }

    #[test]
    fn json_lists_passes() {
        let fx = EffectsPipeline::new(&FeatureSet::BASE, Viewport::default());
        let json = fx.to_json().unwrap();
        assert!(json.contains("\"type\":\"god_rays\""));
        assert!(json.contains("\"source\":\"sun\""));
        assert!(json.contains("\"generation\":0"));
    }
}
