//! Timed source→target interpolation

use crate::easing::Easing;

/// A two-axis eased transition between fixed start and end times
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub h_source: f64,
    pub h_target: f64,
    pub v_source: f64,
    pub v_target: f64,
    /// Start time in milliseconds
    pub start_time: f64,
    /// End time in milliseconds
    pub end_time: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(
        source: (f64, f64),
        target: (f64, f64),
        start_time: f64,
        duration_ms: f64,
        easing: Easing,
    ) -> Self {
        Self {
            h_source: source.0,
            h_target: target.0,
            v_source: source.1,
            v_target: target.1,
            start_time,
            end_time: start_time + duration_ms.max(0.0),
            easing,
        }
    }

    pub fn target(&self) -> (f64, f64) {
        (self.h_target, self.v_target)
    }

    pub fn is_finished(&self, now: f64) -> bool {
        now >= self.end_time
    }

    /// Eased progress in `0.0..=1.0`
    pub fn progress(&self, now: f64) -> f64 {
        let span = self.end_time - self.start_time;
        if span <= 0.0 || now >= self.end_time {
            return 1.0;
        }
        self.easing.apply((now - self.start_time) / span)
    }

    /// Interpolated values at `now`. Finished tweens return the exact target.
    pub fn value_at(&self, now: f64) -> (f64, f64) {
        if self.is_finished(now) {
            return self.target();
        }
        let t = self.progress(now);
        (
            self.h_source + t * (self.h_target - self.h_source),
            self.v_source + t * (self.v_target - self.v_source),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tween_interpolates_both_axes() {
        let tween = Tween::new((0.0, 100.0), (100.0, 0.0), 0.0, 100.0, Easing::Linear);
        assert_eq!(tween.value_at(0.0), (0.0, 100.0));
        assert_eq!(tween.value_at(25.0), (25.0, 75.0));
    }

    #[test]
    fn test_tween_snaps_to_target_at_end() {
        let tween = Tween::new((3.3, 0.0), (600.0, 0.1), 10.0, 200.0, Easing::EaseOutCubic);
        assert!(!tween.is_finished(209.9));
        assert_eq!(tween.value_at(210.0), (600.0, 0.1));
        assert_eq!(tween.value_at(5000.0), (600.0, 0.1));
    }

    #[test]
    fn test_before_start_holds_source() {
        let tween = Tween::new((10.0, 20.0), (30.0, 40.0), 100.0, 50.0, Easing::EaseOutCubic);
        assert_eq!(tween.value_at(50.0), (10.0, 20.0));
    }

    #[test]
    fn test_zero_duration_is_immediately_finished() {
        let tween = Tween::new((0.0, 0.0), (5.0, 5.0), 0.0, 0.0, Easing::Linear);
        assert!(tween.is_finished(0.0));
        assert_eq!(tween.progress(0.0), 1.0);
    }
}
