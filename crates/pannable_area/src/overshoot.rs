//! Rubber-band overshoot
//!
//! Overshoot is tracked beside the axis value, never inside it: the value
//! stays within its bounds while the signed overshoot carries the content
//! past them. Negative overshoot lies before `lower`, positive overshoot
//! after `upper - page_size`.

use crate::axis::{Axis, ScrollAxis};

/// Minimum return speed of a bounce, in pixels per step
const MIN_RETURN_STEP: f64 = 10.0;

/// Fraction of the remaining overshoot covered by each return step
const RETURN_FACTOR: f64 = 0.8;

/// Overshoot distance and bounce progress for both axes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OvershootState {
    pub overshoot_x: f64,
    pub overshoot_y: f64,
    /// Outward bounce steps taken on the horizontal axis; 0 when not bouncing
    pub overshooting_x: u32,
    pub overshooting_y: u32,
}

impl OvershootState {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.overshoot_x,
            Axis::Vertical => self.overshoot_y,
        }
    }

    pub fn is_overshooting(&self, axis: Axis) -> bool {
        self.get(axis) != 0.0
    }

    pub fn any(&self) -> bool {
        self.overshoot_x != 0.0 || self.overshoot_y != 0.0
    }

    pub fn flags(&self) -> (bool, bool) {
        (
            self.is_overshooting(Axis::Horizontal),
            self.is_overshooting(Axis::Vertical),
        )
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn axis_mut(&mut self, axis: Axis) -> AxisOvershoot<'_> {
        match axis {
            Axis::Horizontal => AxisOvershoot {
                distance: &mut self.overshoot_x,
                steps: &mut self.overshooting_x,
            },
            Axis::Vertical => AxisOvershoot {
                distance: &mut self.overshoot_y,
                steps: &mut self.overshooting_y,
            },
        }
    }
}

/// Mutable view of one axis' overshoot
pub(crate) struct AxisOvershoot<'a> {
    pub distance: &'a mut f64,
    pub steps: &'a mut u32,
}

/// Resistance applied to drag movement past a bound
///
/// Starts at 0.55 and stiffens linearly to 0.10 as the stretch approaches
/// the maximum.
pub fn drag_resistance(overshoot: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    let stretch_ratio = (overshoot.abs() / max).min(1.0);
    0.55 - stretch_ratio * 0.45
}

/// Apply a content-space drag delta to an axis, spilling into overshoot.
///
/// While overshooting, movement back towards the range first unwinds the
/// overshoot at full rate; movement further out meets [`drag_resistance`].
pub(crate) fn drag_axis(axis: &mut ScrollAxis, overshoot: AxisOvershoot<'_>, delta: f64, max: f64) {
    let distance = overshoot.distance;
    *overshoot.steps = 0;

    if *distance != 0.0 {
        let side = distance.signum();
        if delta * side > 0.0 {
            let resisted = delta * drag_resistance(*distance, max);
            *distance = (*distance + resisted).clamp(-max, max);
            return;
        }
        let unwound = *distance + delta;
        if unwound * side > 0.0 {
            *distance = unwound;
            return;
        }
        // Back inside; the remainder scrolls the content
        *distance = 0.0;
        axis.set_value(axis.value() + unwound);
        return;
    }

    let target = axis.value() + delta;
    let excess = axis.excess(target);
    axis.set_value(target);
    if excess != 0.0 && max > 0.0 {
        *distance = (excess * drag_resistance(0.0, max)).clamp(-max, max);
    }
}

/// What an axis is doing between steps
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AxisMotion {
    #[default]
    Rest,
    Coasting,
    Bouncing,
}

/// Per-step physics parameters for one axis
#[derive(Clone, Copy, Debug)]
pub(crate) struct StepParams {
    pub deceleration: f64,
    pub low_friction: bool,
    /// Accel-mode finger is down: chase the target, skip friction
    pub held: bool,
    pub drag_inertia: f64,
    pub vel_min: f64,
    pub vel_max_overshooting: f64,
    pub overshoot_max: f64,
    pub bounce_steps: u32,
}

/// Advance one axis by one logical step
pub(crate) fn step_axis(
    motion: AxisMotion,
    axis: &mut ScrollAxis,
    overshoot: AxisOvershoot<'_>,
    velocity: &mut f64,
    accel: f64,
    params: &StepParams,
) -> AxisMotion {
    match motion {
        AxisMotion::Rest => AxisMotion::Rest,
        AxisMotion::Coasting => coast(axis, overshoot, velocity, accel, params),
        AxisMotion::Bouncing => {
            if bounce(
                overshoot.distance,
                overshoot.steps,
                velocity,
                params.overshoot_max,
                params.bounce_steps,
            ) {
                AxisMotion::Bouncing
            } else {
                AxisMotion::Rest
            }
        }
    }
}

fn coast(
    axis: &mut ScrollAxis,
    overshoot: AxisOvershoot<'_>,
    velocity: &mut f64,
    accel: f64,
    params: &StepParams,
) -> AxisMotion {
    if params.held {
        *velocity = *velocity * (1.0 - params.drag_inertia) + accel * params.drag_inertia;
    }

    let target = axis.value() + *velocity;
    let excess = axis.excess(target);
    axis.set_value(target);

    if excess != 0.0 {
        if params.overshoot_max <= 0.0 {
            *velocity = 0.0;
            return AxisMotion::Rest;
        }
        let side = excess.signum();
        let speed = velocity.abs().min(params.vel_max_overshooting);
        *velocity = side * speed;
        *overshoot.distance = (side * speed).clamp(-params.overshoot_max, params.overshoot_max);
        *overshoot.steps = 1;
        tracing::trace!(excess, speed, "hit edge");
        return AxisMotion::Bouncing;
    }

    if params.held {
        return AxisMotion::Coasting;
    }

    if !params.low_friction {
        *velocity *= params.deceleration;
    }
    if velocity.abs() < params.vel_min {
        *velocity = 0.0;
        return AxisMotion::Rest;
    }
    AxisMotion::Coasting
}

/// One bounce step. Returns false once the overshoot is back at zero.
fn bounce(distance: &mut f64, steps: &mut u32, velocity: &mut f64, max: f64, bounce_steps: u32) -> bool {
    if *distance == 0.0 {
        *steps = 0;
        *velocity = 0.0;
        return false;
    }

    let side = distance.signum();
    let outward = *velocity * side > 0.0;

    if outward && *steps < bounce_steps {
        *steps += 1;
        *velocity *= distance.abs() / max;
    } else if outward {
        *velocity = -*velocity;
    } else {
        *velocity = -side * (RETURN_FACTOR * distance.abs()).max(MIN_RETURN_STEP);
    }

    let next = *distance + *velocity;
    if next * side <= 0.0 {
        // Never cross the bound on the way back
        *distance = 0.0;
        *steps = 0;
        *velocity = 0.0;
        return false;
    }

    *distance = next.clamp(-max, max);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StepParams {
        StepParams {
            deceleration: 0.85,
            low_friction: false,
            held: false,
            drag_inertia: 0.85,
            vel_min: 10.0,
            vel_max_overshooting: 130.0,
            overshoot_max: 150.0,
            bounce_steps: 3,
        }
    }

    #[test]
    fn test_resistance_stiffens_with_stretch() {
        assert_eq!(drag_resistance(0.0, 150.0), 0.55);
        assert!((drag_resistance(150.0, 150.0) - 0.10).abs() < 1e-12);
        assert!(drag_resistance(75.0, 150.0) < 0.55);
        assert_eq!(drag_resistance(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_drag_past_bound_spills_into_overshoot() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        let mut state = OvershootState::default();

        drag_axis(&mut axis, state.axis_mut(Axis::Vertical), -40.0, 150.0);
        assert_eq!(axis.value(), 0.0);
        assert!((state.overshoot_y + 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_overshoot_capped() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        axis.set_value(600.0);
        let mut state = OvershootState::default();

        for _ in 0..200 {
            drag_axis(&mut axis, state.axis_mut(Axis::Vertical), 100.0, 150.0);
        }
        assert!(state.overshoot_y > 0.0);
        assert!(state.overshoot_y <= 150.0);
        assert_eq!(axis.value(), 600.0);
    }

    #[test]
    fn test_drag_back_unwinds_then_scrolls() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        let mut state = OvershootState {
            overshoot_y: -20.0,
            ..Default::default()
        };

        drag_axis(&mut axis, state.axis_mut(Axis::Vertical), 50.0, 150.0);
        assert_eq!(state.overshoot_y, 0.0);
        assert_eq!(axis.value(), 30.0);
    }

    #[test]
    fn test_drag_without_overshoot_allowance_pins() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        let mut state = OvershootState::default();
        drag_axis(&mut axis, state.axis_mut(Axis::Vertical), -40.0, 0.0);
        assert_eq!(state.overshoot_y, 0.0);
        assert_eq!(axis.value(), 0.0);
    }

    #[test]
    fn test_coast_decelerates() {
        let mut axis = ScrollAxis::new(0.0, 10_000.0, 400.0);
        let mut state = OvershootState::default();
        let mut velocity = 100.0;

        let motion = step_axis(
            AxisMotion::Coasting,
            &mut axis,
            state.axis_mut(Axis::Vertical),
            &mut velocity,
            0.0,
            &params(),
        );
        assert_eq!(motion, AxisMotion::Coasting);
        assert_eq!(axis.value(), 100.0);
        assert!((velocity - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_coast_into_edge_starts_bounce() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        axis.set_value(580.0);
        let mut state = OvershootState::default();
        let mut velocity = 400.0;

        let motion = step_axis(
            AxisMotion::Coasting,
            &mut axis,
            state.axis_mut(Axis::Vertical),
            &mut velocity,
            0.0,
            &params(),
        );
        assert_eq!(motion, AxisMotion::Bouncing);
        assert_eq!(axis.value(), 600.0);
        assert_eq!(velocity, 130.0);
        assert_eq!(state.overshoot_y, 130.0);
        assert_eq!(state.overshooting_y, 1);
    }

    #[test]
    fn test_coast_into_edge_without_overshoot_stops() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        let mut state = OvershootState::default();
        let mut velocity = -50.0;
        let params = StepParams {
            overshoot_max: 0.0,
            ..params()
        };

        let motion = step_axis(
            AxisMotion::Coasting,
            &mut axis,
            state.axis_mut(Axis::Vertical),
            &mut velocity,
            0.0,
            &params,
        );
        assert_eq!(motion, AxisMotion::Rest);
        assert_eq!(velocity, 0.0);
        assert_eq!(state.overshoot_y, 0.0);
    }

    #[test]
    fn test_bounce_returns_exactly_to_zero() {
        let mut distance = 130.0;
        let mut steps = 1;
        let mut velocity = 130.0;
        let mut max_seen: f64 = distance;

        let mut iterations = 0;
        while bounce(&mut distance, &mut steps, &mut velocity, 150.0, 3) {
            assert!(distance > 0.0, "crossed the bound: {distance}");
            max_seen = max_seen.max(distance);
            iterations += 1;
            assert!(iterations < 100);
        }

        assert_eq!(distance, 0.0);
        assert_eq!(velocity, 0.0);
        assert_eq!(steps, 0);
        assert!(max_seen <= 150.0);
    }

    #[test]
    fn test_bounce_from_rest_heads_back() {
        let mut distance = -40.0;
        let mut steps = 0;
        let mut velocity = 0.0;

        assert!(bounce(&mut distance, &mut steps, &mut velocity, 150.0, 3));
        assert_eq!(velocity, 32.0);
        assert_eq!(distance, -8.0);
        assert!(!bounce(&mut distance, &mut steps, &mut velocity, 150.0, 3));
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn test_held_coast_chases_target() {
        let mut axis = ScrollAxis::new(0.0, 100_000.0, 400.0);
        let mut state = OvershootState::default();
        let mut velocity = 0.0;
        let params = StepParams {
            held: true,
            ..params()
        };

        let motion = step_axis(
            AxisMotion::Coasting,
            &mut axis,
            state.axis_mut(Axis::Vertical),
            &mut velocity,
            100.0,
            &params,
        );
        assert_eq!(motion, AxisMotion::Coasting);
        assert!((velocity - 85.0).abs() < 1e-9);
        assert!((axis.value() - 85.0).abs() < 1e-9);
    }
}
