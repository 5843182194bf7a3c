use log::{debug, trace};

use crate::api::host::FrameScheduler;
use crate::api::types::TickHandle;

/// Run state of the animation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// The `Stopped → Running → Stopped` machine behind the tick loop.
///
/// At most one tick is pending at a time. A tick is accepted only while
/// running and only if its handle is the pending one, so a callback that was
/// already queued when `stop()` ran cannot execute a tick.
#[derive(Debug)]
pub struct AnimationLoop {
    state: LoopState,
    pending: Option<TickHandle>,
    ticks: u64,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            pending: None,
            ticks: 0,
        }
    }

    /// Start the loop with an immediate tick. No-op if already running.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        if self.state == LoopState::Running {
            return false;
        }
        self.state = LoopState::Running;
        self.pending = Some(scheduler.schedule(0));
        debug!("animation loop started");
        true
    }

    /// Stop the loop, cancelling the pending tick. No-op if already stopped.
    pub fn stop<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> bool {
        if self.state == LoopState::Stopped {
            return false;
        }
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
        self.state = LoopState::Stopped;
        debug!("animation loop stopped after {} ticks", self.ticks);
        true
    }

    /// Decide whether a fired tick may run.
    pub fn accept(&mut self, handle: TickHandle) -> bool {
        if self.state != LoopState::Running || self.pending != Some(handle) {
            trace!("ignoring stale tick {:?}", handle);
            return false;
        }
        self.pending = None;
        self.ticks += 1;
        true
    }

    /// Queue the next tick after a completed one.
    pub fn reschedule<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S, delay_ms: u32) {
        if self.state == LoopState::Running && self.pending.is_none() {
            self.pending = Some(scheduler.schedule(delay_ms));
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }
}

impl Default for AnimationLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Timers {
        next: u32,
        scheduled: Vec<(TickHandle, u32)>,
        cancelled: Vec<TickHandle>,
    }

    impl FrameScheduler for Timers {
        fn schedule(&mut self, delay_ms: u32) -> TickHandle {
            self.next += 1;
            let handle = TickHandle(self.next);
            self.scheduled.push((handle, delay_ms));
            handle
        }

        fn cancel(&mut self, handle: TickHandle) {
            self.cancelled.push(handle);
        }
    }

    #[test]
    fn double_start_schedules_once() {
        let mut timers = Timers::default();
        let mut lp = AnimationLoop::new();
        assert!(lp.start(&mut timers));
        assert!(!lp.start(&mut timers));
        assert_eq!(timers.scheduled.len(), 1);
        assert_eq!(timers.scheduled[0].1, 0);
    }

    #[test]
    fn stop_cancels_pending_and_is_idempotent() {
        let mut timers = Timers::default();
        let mut lp = AnimationLoop::new();
        lp.start(&mut timers);
        assert!(lp.stop(&mut timers));
        assert!(!lp.stop(&mut timers));
        assert_eq!(timers.cancelled, vec![TickHandle(1)]);
        assert_eq!(lp.state(), LoopState::Stopped);
    }

    #[test]
    fn tick_after_stop_is_rejected() {
        let mut timers = Timers::default();
        let mut lp = AnimationLoop::new();
        lp.start(&mut timers);
        let handle = lp.pending.unwrap();
        lp.stop(&mut timers);
        assert!(!lp.accept(handle));
        assert_eq!(lp.ticks, 0);
    }

    #[test]
    fn only_the_pending_handle_runs() {
        let mut timers = Timers::default();
        let mut lp = AnimationLoop::new();
        lp.start(&mut timers);
        assert!(!lp.accept(TickHandle(99)));
        assert!(lp.accept(TickHandle(1)));
        // the same handle cannot fire twice
        assert!(!lp.accept(TickHandle(1)));
    }

    #[test]
    fn reschedule_keeps_one_pending_tick() {
        let mut timers = Timers::default();
        let mut lp = AnimationLoop::new();
        lp.start(&mut timers);
        lp.accept(TickHandle(1));
        lp.reschedule(&mut timers, 100);
        lp.reschedule(&mut timers, 100);
        assert_eq!(timers.scheduled.len(), 2);
        assert_eq!(lp.pending, Some(TickHandle(2)));
    }

    #[test]
    fn restart_after_stop() {
        let mut timers = Timers::default();
        let mut lp = AnimationLoop::new();
        lp.start(&mut timers);
        lp.stop(&mut timers);
        assert!(lp.start(&mut timers));
        assert!(!lp.accept(TickHandle(1)));
        assert!(lp.accept(TickHandle(2)));
    }
}
