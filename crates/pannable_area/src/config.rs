//! Pannable area configuration
//!
//! Loaded from TOML; every field has a default so partial files work.
//! [`PannableConfig::validate`] runs at the boundary, before a config
//! reaches the controller.

use std::fs;
use std::path::Path;

use pannable_animation::Easing;
use serde::{Deserialize, Serialize};

use crate::axis::Axis;
use crate::error::ConfigError;

/// How pointer drags move the content
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanMode {
    /// Content follows the finger and keeps moving after release
    #[default]
    Auto,
    /// Content follows the finger only; no fling on release
    Push,
    /// Finger displacement sets a scroll velocity, like a joystick
    Accel,
}

/// Which axes a drag is allowed to move
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementMode {
    Horizontal,
    #[default]
    Vertical,
    Both,
}

impl MovementMode {
    pub fn allows(&self, axis: Axis) -> bool {
        matches!(
            (self, axis),
            (MovementMode::Both, _)
                | (MovementMode::Horizontal, Axis::Horizontal)
                | (MovementMode::Vertical, Axis::Vertical)
        )
    }
}

/// Tuning parameters for kinetic panning
///
/// Velocities are in pixels per logical step; a logical step lasts
/// `1000 / sps` milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PannableConfig {
    /// Flings slower than this stop immediately
    pub vel_min: f64,
    pub vel_max: f64,
    /// Velocity cap once an axis is past its bound
    pub vel_max_overshooting: f64,
    /// Fraction of `vel_max` above which motion counts as fast
    pub vfast_factor: f64,
    /// Velocity multiplier applied every step during free run
    pub deceleration: f64,
    /// Weight of the newest sample when smoothing drag velocity
    pub drag_inertia: f64,
    /// Logical steps per second
    pub sps: u32,
    /// Pointer travel before a press becomes a drag
    pub panning_threshold: f64,
    pub direction_error_margin: f64,
    /// Outward steps before an overshoot turns back
    pub bounce_steps: u32,
    pub hovershoot_max: f64,
    pub vovershoot_max: f64,
    pub scroll_duration_ms: f64,
    pub scroll_easing: Easing,
    pub scrollbar_fade_delay_ms: f64,
    /// Skip deceleration during free run
    pub low_friction_mode: bool,
    /// Flash the indicators when a surface is attached
    pub initial_hint: bool,
    /// Scroll a newly focused child to the center of the viewport
    pub center_on_child_focus: bool,
    pub enabled: bool,
    pub mode: PanMode,
    pub movement_mode: MovementMode,
}

impl Default for PannableConfig {
    fn default() -> Self {
        Self {
            vel_min: 10.0,
            vel_max: 3500.0,
            vel_max_overshooting: 130.0,
            vfast_factor: 0.01,
            deceleration: 0.85,
            drag_inertia: 0.85,
            sps: 20,
            panning_threshold: 25.0,
            direction_error_margin: 10.0,
            bounce_steps: 3,
            hovershoot_max: 150.0,
            vovershoot_max: 150.0,
            scroll_duration_ms: 200.0,
            scroll_easing: Easing::EaseOutCubic,
            scrollbar_fade_delay_ms: 1000.0,
            low_friction_mode: false,
            initial_hint: true,
            center_on_child_focus: false,
            enabled: true,
            mode: PanMode::Auto,
            movement_mode: MovementMode::Vertical,
        }
    }
}

impl PannableConfig {
    /// Config with overshoot disabled on both axes
    pub fn no_overshoot() -> Self {
        Self {
            hovershoot_max: 0.0,
            vovershoot_max: 0.0,
            ..Default::default()
        }
    }

    /// Config that pans in both directions
    pub fn free_panning() -> Self {
        Self {
            movement_mode: MovementMode::Both,
            ..Default::default()
        }
    }

    /// Duration of one logical step in milliseconds
    pub fn step_interval_ms(&self) -> f64 {
        1000.0 / self.sps.max(1) as f64
    }

    pub fn overshoot_max(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.hovershoot_max,
            Axis::Vertical => self.vovershoot_max,
        }
    }

    /// Speed above which a press stops motion instead of reaching content
    pub fn fast_velocity(&self) -> f64 {
        self.vfast_factor * self.vel_max
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("vel_min", self.vel_min),
            ("vel_max", self.vel_max),
            ("vel_max_overshooting", self.vel_max_overshooting),
            ("vfast_factor", self.vfast_factor),
            ("deceleration", self.deceleration),
            ("drag_inertia", self.drag_inertia),
            ("panning_threshold", self.panning_threshold),
            ("direction_error_margin", self.direction_error_margin),
            ("hovershoot_max", self.hovershoot_max),
            ("vovershoot_max", self.vovershoot_max),
            ("scroll_duration_ms", self.scroll_duration_ms),
            ("scrollbar_fade_delay_ms", self.scrollbar_fade_delay_ms),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }

        for (field, value) in [
            ("deceleration", self.deceleration),
            ("drag_inertia", self.drag_inertia),
            ("vfast_factor", self.vfast_factor),
        ] {
            check_range(field, value, 0.0, 1.0)?;
        }

        for (field, value) in [
            ("vel_min", self.vel_min),
            ("vel_max", self.vel_max),
            ("vel_max_overshooting", self.vel_max_overshooting),
            ("panning_threshold", self.panning_threshold),
            ("direction_error_margin", self.direction_error_margin),
            ("hovershoot_max", self.hovershoot_max),
            ("vovershoot_max", self.vovershoot_max),
            ("scroll_duration_ms", self.scroll_duration_ms),
            ("scrollbar_fade_delay_ms", self.scrollbar_fade_delay_ms),
        ] {
            check_range(field, value, 0.0, f64::MAX)?;
        }

        if self.sps < 1 {
            return Err(ConfigError::OutOfRange {
                field: "sps",
                value: self.sps as f64,
                min: 1.0,
                max: u32::MAX as f64,
            });
        }

        if self.vel_min > self.vel_max {
            return Err(ConfigError::VelocityBounds {
                min: self.vel_min,
                max: self.vel_max,
            });
        }

        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: PannableConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Serialize to a TOML document
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value < min || value > max {
        tracing::warn!(field, value, "rejected configuration value");
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
