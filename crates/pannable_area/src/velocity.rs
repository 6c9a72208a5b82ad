//! Drag velocity estimation
//!
//! Pointer motion is sampled at the configured logical rate. Each sample
//! turns the distance covered since the previous one into pixels per
//! logical step and blends it into the running velocity with
//! `drag_inertia`. All values are in content space: positive velocity
//! moves the scroll value towards `upper`.

use crate::axis::Axis;
use crate::config::PannableConfig;

/// Current and target velocity for both axes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VelocityState {
    pub vel_x: f64,
    pub vel_y: f64,
    /// Target velocity in accel pan mode
    pub accel_x: f64,
    pub accel_y: f64,
}

impl VelocityState {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.vel_x,
            Axis::Vertical => self.vel_y,
        }
    }

    pub fn set(&mut self, axis: Axis, velocity: f64) {
        match axis {
            Axis::Horizontal => self.vel_x = velocity,
            Axis::Vertical => self.vel_y = velocity,
        }
    }

    pub fn accel(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.accel_x,
            Axis::Vertical => self.accel_y,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.vel_x == 0.0 && self.vel_y == 0.0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Accumulates pointer deltas into a smoothed velocity
#[derive(Clone, Debug, Default)]
pub struct VelocityEstimator {
    state: VelocityState,
    pending_x: f64,
    pending_y: f64,
    last_sample_time: Option<f64>,
}

impl VelocityEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &VelocityState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut VelocityState {
        &mut self.state
    }

    /// Zero everything and start sampling from `time`
    pub fn reset(&mut self, time: f64) {
        self.state.reset();
        self.pending_x = 0.0;
        self.pending_y = 0.0;
        self.last_sample_time = Some(time);
    }

    /// Record a content-space displacement observed at `time`.
    ///
    /// Returns true when a new sample was taken.
    pub fn record(&mut self, dx: f64, dy: f64, time: f64, config: &PannableConfig) -> bool {
        self.pending_x += dx;
        self.pending_y += dy;

        let Some(last) = self.last_sample_time else {
            self.last_sample_time = Some(time);
            return false;
        };

        let elapsed = time - last;
        let interval = config.step_interval_ms();
        if elapsed < interval {
            return false;
        }

        let inertia = config.drag_inertia;
        let instant_x = self.pending_x / elapsed * interval;
        let instant_y = self.pending_y / elapsed * interval;

        self.state.vel_x = clamp_magnitude(
            inertia * instant_x + (1.0 - inertia) * self.state.vel_x,
            config.vel_max,
        );
        self.state.vel_y = clamp_magnitude(
            inertia * instant_y + (1.0 - inertia) * self.state.vel_y,
            config.vel_max,
        );

        tracing::trace!(
            vel_x = self.state.vel_x,
            vel_y = self.state.vel_y,
            elapsed,
            "velocity sample"
        );

        self.pending_x = 0.0;
        self.pending_y = 0.0;
        self.last_sample_time = Some(time);
        true
    }

    /// Velocity to hand to the driver on release.
    ///
    /// Axes slower than `vel_min` stop; the rest are capped at `vel_max`,
    /// or at `vel_max_overshooting` for an axis that is past its bound.
    pub fn launch_velocity(&self, config: &PannableConfig, overshooting: (bool, bool)) -> (f64, f64) {
        let launch = |velocity: f64, overshooting: bool| {
            if velocity.abs() < config.vel_min {
                return 0.0;
            }
            let cap = if overshooting {
                config.vel_max_overshooting
            } else {
                config.vel_max
            };
            clamp_magnitude(velocity, cap)
        };
        (
            launch(self.state.vel_x, overshooting.0),
            launch(self.state.vel_y, overshooting.1),
        )
    }

    /// Whether current motion is fast enough that a press should stop it
    /// rather than reach the content
    pub fn is_fast(&self, config: &PannableConfig) -> bool {
        let fast = config.fast_velocity();
        self.state.vel_x.abs() > fast || self.state.vel_y.abs() > fast
    }
}

/// Target velocity for an accel-mode displacement of `distance` pixels
/// across a viewport `extent` pixels long
pub fn accel_target(distance: f64, extent: f64, config: &PannableConfig) -> f64 {
    if distance == 0.0 || extent <= 0.0 {
        return 0.0;
    }
    let magnitude = distance.abs() / extent * (config.vel_max - config.vel_min) + config.vel_min;
    distance.signum() * magnitude.min(config.vel_max)
}

fn clamp_magnitude(value: f64, max: f64) -> f64 {
    value.clamp(-max, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sample_before_interval() {
        let config = PannableConfig::default();
        let mut estimator = VelocityEstimator::new();
        estimator.reset(0.0);

        assert!(!estimator.record(0.0, 10.0, 20.0, &config));
        assert_eq!(estimator.state().vel_y, 0.0);
    }

    #[test]
    fn test_sample_converts_to_pixels_per_step() {
        let config = PannableConfig::default();
        let mut estimator = VelocityEstimator::new();
        estimator.reset(0.0);

        // 40px over 50ms is 40px per step; blended with 0.85 inertia
        estimator.record(0.0, 20.0, 25.0, &config);
        assert!(estimator.record(0.0, 20.0, 50.0, &config));
        assert!((estimator.state().vel_y - 34.0).abs() < 1e-9);
        assert_eq!(estimator.state().vel_x, 0.0);
    }

    #[test]
    fn test_sample_clamped_to_vel_max() {
        let config = PannableConfig {
            vel_max: 100.0,
            ..Default::default()
        };
        let mut estimator = VelocityEstimator::new();
        estimator.reset(0.0);
        estimator.record(-5000.0, 0.0, 50.0, &config);
        assert_eq!(estimator.state().vel_x, -100.0);
    }

    #[test]
    fn test_launch_velocity_floors_and_caps() {
        let config = PannableConfig::default();
        let mut estimator = VelocityEstimator::new();
        estimator.state_mut().vel_x = 5.0;
        estimator.state_mut().vel_y = -400.0;

        assert_eq!(estimator.launch_velocity(&config, (false, false)), (0.0, -400.0));
        assert_eq!(estimator.launch_velocity(&config, (false, true)), (0.0, -130.0));
    }

    #[test]
    fn test_is_fast() {
        let config = PannableConfig::default();
        let mut estimator = VelocityEstimator::new();
        estimator.state_mut().vel_y = 30.0;
        assert!(!estimator.is_fast(&config));
        estimator.state_mut().vel_y = -40.0;
        assert!(estimator.is_fast(&config));
    }

    #[test]
    fn test_accel_target_scales_with_displacement() {
        let config = PannableConfig::default();
        assert_eq!(accel_target(0.0, 400.0, &config), 0.0);
        assert_eq!(accel_target(200.0, 400.0, &config), 0.5 * 3490.0 + 10.0);
        assert_eq!(accel_target(-400.0, 400.0, &config), -3500.0);
        assert_eq!(accel_target(50.0, 0.0, &config), 0.0);
    }
}
