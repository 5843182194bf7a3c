use serde::Serialize;

/// Opaque handle for one scheduled tick, issued by the host scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u32);

/// Identifies one asynchronous lookup.
///
/// `session` changes every time the clock is stopped, so results issued
/// before a stop are never applied. `seq` is strictly increasing per inbox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticket {
    pub session: u32,
    pub seq: u64,
    pub issued_at_ms: f64,
}

/// Visible drawing area in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Camera placement mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PovMode {
    /// Standing on the ground next to the lamp.
    First,
    /// Orbiting the diorama.
    Third,
}

impl PovMode {
    pub fn toggled(self) -> Self {
        match self {
            PovMode::First => PovMode::Third,
            PovMode::Third => PovMode::First,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PovMode::First => "1st POV",
            PovMode::Third => "3rd POV",
        }
    }
}

/// Tick cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameRate {
    /// 100 ms between ticks.
    Low,
    /// 25 ms between ticks.
    High,
}

impl FrameRate {
    pub fn delay_ms(self) -> u32 {
        match self {
            FrameRate::Low => 100,
            FrameRate::High => 25,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FrameRate::Low => FrameRate::High,
            FrameRate::High => FrameRate::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FrameRate::Low => "10 FPS",
            FrameRate::High => "40 FPS",
        }
    }
}
