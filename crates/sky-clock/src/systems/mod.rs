pub mod bodies;
pub mod flicker;
pub mod format;
pub mod lighting;
pub mod overlay;
pub mod satellite;
