//! Scroll position model
//!
//! A [`ScrollAxis`] is a bounded 1-D range. Its value always satisfies
//! `lower <= value <= max(lower, upper - page_size)`; every mutation goes
//! through [`ScrollAxis::clamp`].

pub use pannable_core::Axis;

/// A bounded scroll range (one per direction)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAxis {
    lower: f64,
    upper: f64,
    page_size: f64,
    value: f64,
}

impl Default for ScrollAxis {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl ScrollAxis {
    /// Create an axis positioned at `lower`
    pub fn new(lower: f64, upper: f64, page_size: f64) -> Self {
        Self {
            lower,
            upper: upper.max(lower),
            page_size: page_size.max(0.0),
            value: lower,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn page_size(&self) -> f64 {
        self.page_size
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Largest reachable value; never below `lower`
    pub fn max_value(&self) -> f64 {
        (self.upper - self.page_size).max(self.lower)
    }

    /// Whether the content is larger than the page
    pub fn is_scrollable(&self) -> bool {
        self.upper - self.lower > self.page_size
    }

    /// Clamp a candidate value into the valid range
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.lower;
        }
        // min then max, so a page larger than the range pins to lower
        value.min(self.upper - self.page_size).max(self.lower)
    }

    /// Signed distance a candidate lies beyond the range (0 when inside)
    pub fn excess(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        value - self.clamp(value)
    }

    /// Set the value, clamped. Returns true if it changed.
    pub fn set_value(&mut self, value: f64) -> bool {
        let clamped = self.clamp(value);
        if clamped == self.value {
            return false;
        }
        self.value = clamped;
        true
    }

    /// Replace the range and re-clamp the value. Returns true if the value moved.
    pub fn set_range(&mut self, lower: f64, upper: f64, page_size: f64) -> bool {
        self.lower = lower;
        self.upper = upper.max(lower);
        self.page_size = page_size.max(0.0);
        let clamped = self.clamp(self.value);
        let moved = clamped != self.value;
        self.value = clamped;
        moved
    }

    /// Value that centers `point` in the page, clamped
    pub fn centered_target(&self, point: f64) -> f64 {
        self.clamp(point - self.page_size / 2.0)
    }
}

/// The horizontal and vertical axes of one area
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Axes {
    pub horizontal: ScrollAxis,
    pub vertical: ScrollAxis,
}

impl Axes {
    pub fn get(&self, axis: Axis) -> &ScrollAxis {
        match axis {
            Axis::Horizontal => &self.horizontal,
            Axis::Vertical => &self.vertical,
        }
    }

    pub fn get_mut(&mut self, axis: Axis) -> &mut ScrollAxis {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    pub fn values(&self) -> (f64, f64) {
        (self.horizontal.value(), self.vertical.value())
    }

    pub fn any_scrollable(&self) -> bool {
        self.horizontal.is_scrollable() || self.vertical.is_scrollable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_clamps_into_range() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        assert!(axis.set_value(250.0));
        assert_eq!(axis.value(), 250.0);

        axis.set_value(5000.0);
        assert_eq!(axis.value(), 600.0);

        axis.set_value(-20.0);
        assert_eq!(axis.value(), 0.0);
    }

    #[test]
    fn test_small_content_pins_to_lower() {
        let mut axis = ScrollAxis::new(10.0, 300.0, 400.0);
        assert!(!axis.is_scrollable());
        assert!(!axis.set_value(120.0));
        assert_eq!(axis.value(), 10.0);
        assert_eq!(axis.max_value(), 10.0);
    }

    #[test]
    fn test_set_value_reports_unchanged() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        axis.set_value(100.0);
        assert!(!axis.set_value(100.0));
    }

    #[test]
    fn test_nan_lands_on_lower() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        axis.set_value(300.0);
        axis.set_value(f64::NAN);
        assert_eq!(axis.value(), 0.0);
    }

    #[test]
    fn test_excess_is_signed() {
        let axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        assert_eq!(axis.excess(-30.0), -30.0);
        assert_eq!(axis.excess(650.0), 50.0);
        assert_eq!(axis.excess(300.0), 0.0);
    }

    #[test]
    fn test_set_range_reclamps_value() {
        let mut axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        axis.set_value(600.0);
        assert!(axis.set_range(0.0, 800.0, 400.0));
        assert_eq!(axis.value(), 400.0);
    }

    #[test]
    fn test_centered_target() {
        let axis = ScrollAxis::new(0.0, 1000.0, 400.0);
        assert_eq!(axis.centered_target(800.0), 600.0);
        assert_eq!(axis.centered_target(500.0), 300.0);
        assert_eq!(axis.centered_target(50.0), 0.0);
    }
}
