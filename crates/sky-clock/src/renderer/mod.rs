pub mod camera;
pub mod effects;
pub mod traits;

// Re-export key types for convenient access
pub use traits::{Frame, Renderer};
