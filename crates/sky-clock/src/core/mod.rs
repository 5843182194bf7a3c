pub mod inbox;
pub mod lifecycle;
pub mod observer;
pub mod scene;
