pub mod api;
pub mod astro;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod clock;

// Re-export key types at crate root for convenience
pub use api::config::{ClockConfig, FeatureSet, GeoPoint, Variant};
pub use api::error::{AssetError, ConfigError, TrackingError};
pub use api::host::{
    ClockHost, Environment, FrameScheduler, LocationFix, LocationSource, SatelliteQuery,
    SatelliteSource,
};
pub use api::types::{FrameRate, PovMode, TickHandle, Ticket, Viewport};
pub use astro::{CelestialPosition, MoonIllumination, MoonPosition, Planet, SatelliteFix};
pub use bridge::protocol::{FrameBuffer, NodeRecord};
pub use clock::SkyClock;
pub use components::blueprint::SceneBlueprint;
pub use components::node::{NodeKind, SceneNode};
pub use core::lifecycle::LoopState;
pub use core::scene::SceneGraph;
pub use renderer::camera::CameraRig;
pub use renderer::effects::EffectsPipeline;
pub use renderer::traits::{Frame, Renderer};
pub use systems::overlay::{Overlay, OverlayElement, OverlayId};
