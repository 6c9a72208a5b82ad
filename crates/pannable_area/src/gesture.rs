//! Press / drag / release classification
//!
//! A press stays a click until the pointer travels further than
//! `panning_threshold` from the press point on either axis. The event that
//! crosses the threshold decides the drag direction; its displacement is
//! not applied to the content.

use pannable_core::MovementDirection;

use crate::axis::Axis;
use crate::config::PannableConfig;

/// Release more than this long after the last motion counts as stopped
pub const CURSOR_STOPPED_MS: f64 = 200.0;

/// Whether a pointer event was used by the area or should reach the content
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
    Consumed,
    PassThrough,
}

impl Propagation {
    pub fn is_consumed(&self) -> bool {
        matches!(self, Propagation::Consumed)
    }
}

/// A pointer position at a point in time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub x: f64,
    pub y: f64,
    pub time: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GesturePhase {
    Released,
    /// Pressed, still within the click threshold
    Pressed,
    Dragging,
    /// The movement mode excludes the drag direction
    Refused,
    /// A listener cancelled the drag
    Vetoed,
}

/// Result of feeding a motion event to the tracker
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MotionOutcome {
    /// No button held
    Ignored,
    /// Still within the click threshold
    Click,
    /// The threshold was crossed by this event
    DragStarted {
        direction: MovementDirection,
        axis: Axis,
        /// False when the movement mode excludes the detected axis
        allowed: bool,
    },
    /// Pointer delta since the previous sample, in pointer space
    Drag { dx: f64, dy: f64 },
    /// The drag direction is excluded by the movement mode
    Refused,
    /// A listener cancelled the drag; motion is swallowed without scrolling
    Vetoed,
}

/// Result of a release
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReleaseOutcome {
    /// The tracker had seen a press
    pub was_pressed: bool,
    /// The gesture became an accepted drag
    pub was_drag: bool,
    /// A listener cancelled the drag
    pub vetoed: bool,
    /// The pointer rested longer than [`CURSOR_STOPPED_MS`] before release
    pub stopped: bool,
}

/// Tracks one pointer gesture at a time
#[derive(Clone, Debug)]
pub struct GestureTracker {
    phase: GesturePhase,
    press: Option<GestureSample>,
    last: Option<GestureSample>,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureTracker {
    pub fn new() -> Self {
        Self {
            phase: GesturePhase::Released,
            press: None,
            last: None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.phase != GesturePhase::Released
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == GesturePhase::Dragging
    }

    /// Where the current gesture started
    pub fn press_sample(&self) -> Option<GestureSample> {
        self.press
    }

    pub fn press(&mut self, x: f64, y: f64, time: f64) {
        let sample = GestureSample { x, y, time };
        self.phase = GesturePhase::Pressed;
        self.press = Some(sample);
        self.last = Some(sample);
    }

    pub fn motion(&mut self, x: f64, y: f64, time: f64, config: &PannableConfig) -> MotionOutcome {
        let (Some(press), Some(last)) = (self.press, self.last) else {
            return MotionOutcome::Ignored;
        };
        let sample = GestureSample { x, y, time };

        match self.phase {
            GesturePhase::Released => MotionOutcome::Ignored,
            GesturePhase::Refused => MotionOutcome::Refused,
            GesturePhase::Vetoed => MotionOutcome::Vetoed,
            GesturePhase::Dragging => {
                self.last = Some(sample);
                MotionOutcome::Drag {
                    dx: x - last.x,
                    dy: y - last.y,
                }
            }
            GesturePhase::Pressed => {
                let dx = x - press.x;
                let dy = y - press.y;
                let threshold = config.panning_threshold;
                if dx.abs() <= threshold && dy.abs() <= threshold {
                    return MotionOutcome::Click;
                }

                let (axis, direction) = if dy.abs() >= dx.abs() {
                    let direction = if dy < 0.0 {
                        MovementDirection::Up
                    } else {
                        MovementDirection::Down
                    };
                    (Axis::Vertical, direction)
                } else {
                    let direction = if dx < 0.0 {
                        MovementDirection::Left
                    } else {
                        MovementDirection::Right
                    };
                    (Axis::Horizontal, direction)
                };

                let major = dx.abs().max(dy.abs());
                let minor = dx.abs().min(dy.abs());
                let allowed = config.movement_mode.allows(axis)
                    || major - minor < config.direction_error_margin;

                self.phase = if allowed {
                    GesturePhase::Dragging
                } else {
                    GesturePhase::Refused
                };
                // The crossing displacement is consumed; scrolling starts here
                self.last = Some(sample);

                tracing::debug!(?axis, ?direction, allowed, "drag detected");
                MotionOutcome::DragStarted {
                    direction,
                    axis,
                    allowed,
                }
            }
        }
    }

    /// Cancel the current drag; remaining motion is swallowed until release
    pub fn veto(&mut self) {
        if self.phase != GesturePhase::Released {
            self.phase = GesturePhase::Vetoed;
        }
    }

    pub fn release(&mut self, x: f64, y: f64, time: f64) -> ReleaseOutcome {
        let was_pressed = self.phase != GesturePhase::Released;
        let was_drag = self.phase == GesturePhase::Dragging;
        let vetoed = self.phase == GesturePhase::Vetoed;
        let stopped = self
            .last
            .is_some_and(|last| time - last.time > CURSOR_STOPPED_MS);

        tracing::trace!(x, y, was_drag, stopped, "pointer released");

        self.phase = GesturePhase::Released;
        self.press = None;
        self.last = None;

        ReleaseOutcome {
            was_pressed,
            was_drag,
            vetoed,
            stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MovementMode;

    fn both() -> PannableConfig {
        PannableConfig {
            movement_mode: MovementMode::Both,
            ..Default::default()
        }
    }

    #[test]
    fn test_motion_without_press_ignored() {
        let mut tracker = GestureTracker::new();
        assert_eq!(
            tracker.motion(10.0, 10.0, 0.0, &both()),
            MotionOutcome::Ignored
        );
    }

    #[test]
    fn test_small_motion_is_click() {
        let mut tracker = GestureTracker::new();
        tracker.press(100.0, 100.0, 0.0);
        assert_eq!(
            tracker.motion(120.0, 110.0, 10.0, &both()),
            MotionOutcome::Click
        );

        let release = tracker.release(120.0, 110.0, 20.0);
        assert!(release.was_pressed);
        assert!(!release.was_drag);
    }

    #[test]
    fn test_threshold_crossing_detects_direction() {
        let mut tracker = GestureTracker::new();
        tracker.press(100.0, 100.0, 0.0);

        let outcome = tracker.motion(105.0, 60.0, 10.0, &both());
        assert_eq!(
            outcome,
            MotionOutcome::DragStarted {
                direction: MovementDirection::Up,
                axis: Axis::Vertical,
                allowed: true,
            }
        );

        // Deltas are measured from the crossing point, not the press
        assert_eq!(
            tracker.motion(105.0, 50.0, 20.0, &both()),
            MotionOutcome::Drag { dx: 0.0, dy: -10.0 }
        );
    }

    #[test]
    fn test_horizontal_drag_refused_in_vertical_mode() {
        let config = PannableConfig::default();
        let mut tracker = GestureTracker::new();
        tracker.press(100.0, 100.0, 0.0);

        let outcome = tracker.motion(140.0, 102.0, 10.0, &config);
        assert!(matches!(
            outcome,
            MotionOutcome::DragStarted {
                axis: Axis::Horizontal,
                allowed: false,
                ..
            }
        ));
        assert_eq!(
            tracker.motion(150.0, 102.0, 20.0, &config),
            MotionOutcome::Refused
        );
    }

    #[test]
    fn test_ambiguous_diagonal_allowed_within_margin() {
        let config = PannableConfig::default();
        let mut tracker = GestureTracker::new();
        tracker.press(0.0, 0.0, 0.0);

        let outcome = tracker.motion(30.0, 25.0, 10.0, &config);
        assert!(matches!(
            outcome,
            MotionOutcome::DragStarted {
                direction: MovementDirection::Right,
                allowed: true,
                ..
            }
        ));
    }

    #[test]
    fn test_release_after_pause_is_stopped() {
        let mut tracker = GestureTracker::new();
        tracker.press(0.0, 0.0, 0.0);
        tracker.motion(0.0, 40.0, 10.0, &both());
        tracker.motion(0.0, 60.0, 20.0, &both());

        let release = tracker.release(0.0, 60.0, 300.0);
        assert!(release.was_drag);
        assert!(release.stopped);
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn test_veto_stops_drag() {
        let mut tracker = GestureTracker::new();
        tracker.press(0.0, 0.0, 0.0);
        tracker.motion(0.0, 40.0, 10.0, &both());
        tracker.veto();
        assert_eq!(tracker.motion(0.0, 80.0, 20.0, &both()), MotionOutcome::Vetoed);
        let release = tracker.release(0.0, 80.0, 30.0);
        assert!(!release.was_drag);
        assert!(release.vetoed);
    }
}
