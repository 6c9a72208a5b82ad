//! Frame clock
//!
//! The timing source that drives per-frame animation updates. The
//! controller asks the clock for the current frame time and tells it when
//! it needs ticks (`begin_updating`) and when it no longer does
//! (`end_updating`), so an idle area costs no frame callbacks.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic frame timing source
pub trait FrameClock {
    /// Time of the current frame in milliseconds. Never decreases.
    fn frame_time(&self) -> f64;

    /// Start delivering per-frame ticks
    fn begin_updating(&mut self);

    /// Stop delivering per-frame ticks
    fn end_updating(&mut self);

    /// Whether ticks are currently requested
    fn is_updating(&self) -> bool;
}

/// Manually advanced clock for tests and headless runs
///
/// Clones share the same time and updating state, so a test can keep a
/// handle while the controller owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
    updating: Rc<Cell<bool>>,
    begin_count: Rc<Cell<u32>>,
    end_count: Rc<Cell<u32>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at the given time
    pub fn starting_at(ms: f64) -> Self {
        let clock = Self::default();
        clock.now.set(ms);
        clock
    }

    /// Move time forward. Negative deltas are ignored.
    pub fn advance(&self, ms: f64) {
        if ms > 0.0 {
            self.now.set(self.now.get() + ms);
        }
    }

    /// Jump to an absolute time. Times in the past are ignored.
    pub fn set(&self, ms: f64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }

    pub fn now(&self) -> f64 {
        self.now.get()
    }

    /// Number of `begin_updating` calls that actually started updates
    pub fn begin_count(&self) -> u32 {
        self.begin_count.get()
    }

    /// Number of `end_updating` calls that actually stopped updates
    pub fn end_count(&self) -> u32 {
        self.end_count.get()
    }
}

impl FrameClock for ManualClock {
    fn frame_time(&self) -> f64 {
        self.now.get()
    }

    fn begin_updating(&mut self) {
        if !self.updating.replace(true) {
            self.begin_count.set(self.begin_count.get() + 1);
        }
    }

    fn end_updating(&mut self) {
        if self.updating.replace(false) {
            self.end_count.set(self.end_count.get() + 1);
        }
    }

    fn is_updating(&self) -> bool {
        self.updating.get()
    }
}

/// Wall-clock frame timing backed by [`Instant`]
pub struct SystemClock {
    origin: Instant,
    target_fps: u32,
    updating: bool,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            target_fps: 60,
            updating: false,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    /// Interval the host loop should wait between ticks
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps as f64)
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn frame_time(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn begin_updating(&mut self) {
        self.updating = true;
    }

    fn end_updating(&mut self) {
        self.updating = false;
    }

    fn is_updating(&self) -> bool {
        self.updating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let mut handle = clock.clone();

        clock.advance(16.0);
        assert_eq!(handle.frame_time(), 16.0);

        handle.begin_updating();
        assert!(clock.is_updating());
    }

    #[test]
    fn test_manual_clock_is_monotonic() {
        let clock = ManualClock::starting_at(100.0);
        clock.advance(-50.0);
        clock.set(20.0);
        assert_eq!(clock.now(), 100.0);
        clock.set(150.0);
        assert_eq!(clock.now(), 150.0);
    }

    #[test]
    fn test_begin_end_counted_once() {
        let mut clock = ManualClock::new();
        clock.begin_updating();
        clock.begin_updating();
        clock.end_updating();
        clock.end_updating();
        assert_eq!(clock.begin_count(), 1);
        assert_eq!(clock.end_count(), 1);
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock::new();
        let a = clock.frame_time();
        let b = clock.frame_time();
        assert!(b >= a);
        assert_eq!(clock.frame_interval(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn test_system_clock_target_fps() {
        let mut clock = SystemClock::new();
        clock.set_target_fps(30);
        assert_eq!(clock.frame_interval(), Duration::from_secs_f64(1.0 / 30.0));
        clock.set_target_fps(0);
        assert_eq!(clock.frame_interval(), Duration::from_secs(1));
    }
}
