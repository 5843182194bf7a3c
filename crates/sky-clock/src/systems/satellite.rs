/// What the satellite marker should do this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    /// Fire a new lookup.
    Poll,
    /// Second half of the interval: the last fix is getting stale.
    Fade,
    Hold,
}

pub const SATELLITE_ACTIVE: [f32; 3] = [1.0, 0.0, 0.0];
pub const SATELLITE_IDLE: [f32; 3] = [0.0, 0.0, 0.0];

/// Rate limiter for satellite lookups.
///
/// At most one poll per `interval_ms`, however often it is stepped.
#[derive(Debug, Clone)]
pub struct SatellitePoller {
    interval_ms: f64,
    next_poll_ms: f64,
    active: bool,
}

impl SatellitePoller {
    pub fn new(interval_ms: f64, first_poll_at_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            next_poll_ms: first_poll_at_ms,
            active: false,
        }
    }

    pub fn step(&mut self, now_ms: f64) -> PollAction {
        if now_ms >= self.next_poll_ms {
            self.next_poll_ms = now_ms + self.interval_ms;
            self.active = true;
            PollAction::Poll
        } else if now_ms >= self.next_poll_ms - self.interval_ms / 2.0 {
            self.active = false;
            PollAction::Fade
        } else {
            PollAction::Hold
        }
    }

    /// A fresh fix arrived.
    pub fn on_fix(&mut self) {
        self.active = true;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn emissive(&self) -> [f32; 3] {
        if self.active {
            SATELLITE_ACTIVE
        } else {
            SATELLITE_IDLE
        }
    }
}
