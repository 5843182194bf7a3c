pub mod blueprint;
pub mod node;
