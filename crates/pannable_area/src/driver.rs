//! Animation driver
//!
//! Owns the controller's motion state machine: an eased scroll towards a
//! target, kinetic free run after a fling, and rubber-band bounce back.
//! Kinetic motion advances in whole logical steps computed from elapsed
//! frame time, so the result does not depend on the host's frame rate.

use pannable_animation::Tween;
use pannable_core::{transition, EventId, StateTransitions};

use crate::axis::{Axes, Axis};
use crate::config::PannableConfig;
use crate::overshoot::{step_axis, AxisMotion, OvershootState, StepParams};
use crate::velocity::VelocityState;

/// Upper bound on steps simulated in one synchronous settle
pub const MAX_SETTLE_STEPS: u32 = 10_000;

/// Driver state machine events
pub mod driver_events {
    use pannable_core::EventId;

    pub const SCROLL_TO: EventId = 100;
    pub const FLING: EventId = 101;
    pub const HIT_EDGE: EventId = 102;
    pub const SETTLED: EventId = 103;
    pub const ARRIVED: EventId = 104;
    /// Immediate reposition, no animation
    pub const JUMP: EventId = 105;
    /// Any press halts motion
    pub const PRESS: EventId = 106;
    /// A held accel-mode axis finished bouncing and chases its target again
    pub const RESUME: EventId = 107;
}

/// Controller motion state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DriverState {
    #[default]
    Idle,
    AnimatingToTarget,
    KineticFreeRun,
    BouncingBack,
}

impl StateTransitions for DriverState {
    fn on_event(&self, event: EventId) -> Option<Self> {
        use driver_events::*;
        match (self, event) {
            (_, PRESS) => Some(DriverState::Idle),
            (_, JUMP) => Some(DriverState::Idle),
            (_, SCROLL_TO) => Some(DriverState::AnimatingToTarget),
            (DriverState::AnimatingToTarget, ARRIVED) => Some(DriverState::Idle),
            (DriverState::Idle | DriverState::KineticFreeRun, FLING) => {
                Some(DriverState::KineticFreeRun)
            }
            (DriverState::Idle | DriverState::KineticFreeRun, HIT_EDGE) => {
                Some(DriverState::BouncingBack)
            }
            (DriverState::BouncingBack, RESUME) => Some(DriverState::KineticFreeRun),
            (DriverState::KineticFreeRun | DriverState::BouncingBack, SETTLED) => {
                Some(DriverState::Idle)
            }
            _ => None,
        }
    }
}

impl DriverState {
    pub fn is_idle(&self) -> bool {
        matches!(self, DriverState::Idle)
    }
}

/// Mutable physical state the driver acts on
pub struct Physics<'a> {
    pub axes: &'a mut Axes,
    pub velocity: &'a mut VelocityState,
    pub overshoot: &'a mut OvershootState,
    pub config: &'a PannableConfig,
}

/// Drives scroll motion between frames
#[derive(Clone, Debug, Default)]
pub struct AnimationDriver {
    state: DriverState,
    tween: Option<Tween>,
    horizontal: AxisMotion,
    vertical: AxisMotion,
    last_step_time: f64,
    /// Accel-mode finger is down
    held: bool,
    /// Axes the held finger drives, horizontal then vertical
    held_axes: (bool, bool),
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        !self.state.is_idle()
    }

    pub fn motion(&self, axis: Axis) -> AxisMotion {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Target of the running scroll animation, if any
    pub fn target(&self) -> Option<(f64, f64)> {
        self.tween.as_ref().map(Tween::target)
    }

    /// Stop all motion immediately. Overshoot is left in place.
    pub fn halt(&mut self, velocity: &mut VelocityState) {
        transition(&mut self.state, driver_events::PRESS);
        self.clear();
        velocity.reset();
    }

    /// Reposition without animation
    pub fn jump(&mut self) {
        transition(&mut self.state, driver_events::JUMP);
        self.clear();
    }

    pub fn start_tween(&mut self, tween: Tween) {
        self.clear();
        self.tween = Some(tween);
        transition(&mut self.state, driver_events::SCROLL_TO);
    }

    /// Hand release velocity to the driver.
    ///
    /// Overshooting axes bounce back from rest; moving axes coast. Nothing
    /// happens when no axis needs motion.
    pub fn fling(&mut self, phys: &mut Physics<'_>, now: f64) {
        self.tween = None;
        self.held = false;
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let motion = if phys.overshoot.is_overshooting(axis) {
                phys.velocity.set(axis, 0.0);
                AxisMotion::Bouncing
            } else if phys.velocity.get(axis) != 0.0 {
                AxisMotion::Coasting
            } else {
                AxisMotion::Rest
            };
            self.set_motion(axis, motion);
        }
        self.last_step_time = now;
        self.sync_state();
    }

    /// Start accel-mode motion: the given axes chase their target velocity
    /// until [`release_hold`](Self::release_hold)
    pub fn hold(&mut self, horizontal: bool, vertical: bool, now: f64) {
        self.tween = None;
        self.held = true;
        self.held_axes = (horizontal, vertical);
        if horizontal {
            self.horizontal = AxisMotion::Coasting;
        }
        if vertical {
            self.vertical = AxisMotion::Coasting;
        }
        self.last_step_time = now;
        self.sync_state();
    }

    /// Finger lifted in accel mode; motion decelerates from here
    pub fn release_hold(&mut self, phys: &mut Physics<'_>, now: f64) {
        if !self.held {
            return;
        }
        self.held = false;
        self.held_axes = (false, false);
        phys.velocity.accel_x = 0.0;
        phys.velocity.accel_y = 0.0;
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if self.motion(axis) == AxisMotion::Coasting && phys.velocity.get(axis) == 0.0 {
                self.set_motion(axis, AxisMotion::Rest);
            }
        }
        if !self.is_active() {
            self.last_step_time = now;
        }
        self.sync_state();
    }

    /// Advance to frame time `now`. Returns true while motion continues.
    pub fn tick(&mut self, phys: &mut Physics<'_>, now: f64) -> bool {
        match self.state {
            DriverState::Idle => false,
            DriverState::AnimatingToTarget => self.tick_tween(phys, now),
            DriverState::KineticFreeRun | DriverState::BouncingBack => {
                let interval = phys.config.step_interval_ms();
                let elapsed = now - self.last_step_time;
                if elapsed < interval {
                    return true;
                }
                let due = (elapsed / interval).floor() as u32;
                let steps = due.min(phys.config.sps.max(1));
                if steps < due {
                    self.last_step_time = now;
                } else {
                    self.last_step_time += steps as f64 * interval;
                }

                for _ in 0..steps {
                    if !self.step(phys) {
                        return false;
                    }
                }
                true
            }
        }
    }

    /// Run kinetic motion to completion without a clock
    pub fn settle(&mut self, phys: &mut Physics<'_>) {
        if self.state == DriverState::AnimatingToTarget {
            if let Some(tween) = self.tween.take() {
                let (h, v) = tween.target();
                phys.axes.horizontal.set_value(h);
                phys.axes.vertical.set_value(v);
            }
            transition(&mut self.state, driver_events::ARRIVED);
            return;
        }

        self.held = false;
        let mut steps = 0;
        while self.is_active() && steps < MAX_SETTLE_STEPS {
            self.step(phys);
            steps += 1;
        }
        if self.is_active() {
            tracing::warn!(steps, "kinetic motion did not settle; stopping");
            self.clear();
            phys.overshoot.reset();
            phys.velocity.reset();
            transition(&mut self.state, driver_events::SETTLED);
        }
    }

    fn tick_tween(&mut self, phys: &mut Physics<'_>, now: f64) -> bool {
        let Some(tween) = self.tween else {
            transition(&mut self.state, driver_events::ARRIVED);
            return false;
        };
        let (h, v) = tween.value_at(now);
        phys.axes.horizontal.set_value(h);
        phys.axes.vertical.set_value(v);

        if tween.is_finished(now) {
            self.tween = None;
            phys.velocity.reset();
            transition(&mut self.state, driver_events::ARRIVED);
            return false;
        }
        true
    }

    /// One logical step on both axes. Returns false once everything rests.
    fn step(&mut self, phys: &mut Physics<'_>) -> bool {
        let mut hit_edge = false;

        for axis in [Axis::Horizontal, Axis::Vertical] {
            let before = self.motion(axis);
            let params = StepParams {
                deceleration: phys.config.deceleration,
                low_friction: phys.config.low_friction_mode,
                held: self.held,
                drag_inertia: phys.config.drag_inertia,
                vel_min: phys.config.vel_min,
                vel_max_overshooting: phys.config.vel_max_overshooting,
                overshoot_max: phys.config.overshoot_max(axis),
                bounce_steps: phys.config.bounce_steps,
            };

            let mut velocity = phys.velocity.get(axis);
            let accel = phys.velocity.accel(axis);
            let after = step_axis(
                before,
                phys.axes.get_mut(axis),
                phys.overshoot.axis_mut(axis),
                &mut velocity,
                accel,
                &params,
            );
            phys.velocity.set(axis, velocity);

            // A held axis keeps following the finger once it is back at the bound
            let after = if after == AxisMotion::Rest && self.holds(axis) {
                AxisMotion::Coasting
            } else {
                after
            };
            self.set_motion(axis, after);

            if before == AxisMotion::Coasting && after == AxisMotion::Bouncing {
                hit_edge = true;
            }
        }

        tracing::trace!(
            h = phys.axes.horizontal.value(),
            v = phys.axes.vertical.value(),
            vel_x = phys.velocity.vel_x,
            vel_y = phys.velocity.vel_y,
            "kinetic step"
        );

        if hit_edge {
            transition(&mut self.state, driver_events::HIT_EDGE);
        } else if self.held
            && self.horizontal != AxisMotion::Bouncing
            && self.vertical != AxisMotion::Bouncing
        {
            transition(&mut self.state, driver_events::RESUME);
        }

        if self.horizontal == AxisMotion::Rest && self.vertical == AxisMotion::Rest && !self.held {
            phys.velocity.reset();
            transition(&mut self.state, driver_events::SETTLED);
            return false;
        }
        true
    }

    fn holds(&self, axis: Axis) -> bool {
        self.held
            && match axis {
                Axis::Horizontal => self.held_axes.0,
                Axis::Vertical => self.held_axes.1,
            }
    }

    fn set_motion(&mut self, axis: Axis, motion: AxisMotion) {
        match axis {
            Axis::Horizontal => self.horizontal = motion,
            Axis::Vertical => self.vertical = motion,
        }
    }

    /// Derive the machine state from per-axis motion after a fling or hold
    fn sync_state(&mut self) {
        let bouncing = self.horizontal == AxisMotion::Bouncing || self.vertical == AxisMotion::Bouncing;
        let coasting = self.horizontal == AxisMotion::Coasting || self.vertical == AxisMotion::Coasting;

        if coasting || self.held {
            transition(&mut self.state, driver_events::FLING);
        }
        if bouncing {
            transition(&mut self.state, driver_events::HIT_EDGE);
        }
        if !coasting && !bouncing && !self.held {
            transition(&mut self.state, driver_events::SETTLED);
        }
    }

    fn clear(&mut self) {
        self.tween = None;
        self.horizontal = AxisMotion::Rest;
        self.vertical = AxisMotion::Rest;
        self.held = false;
        self.held_axes = (false, false);
    }
}
