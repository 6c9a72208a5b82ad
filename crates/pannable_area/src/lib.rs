//! Pannable Area
//!
//! A touch-oriented kinetic scrolling controller. Pointer input is
//! classified into clicks and drags, drags feed a smoothed velocity, and
//! released drags coast with friction and rubber-band back from the edges.
//! Everything is driven by an external [`FrameClock`](pannable_animation::FrameClock);
//! the controller draws nothing itself.
//!
//! # Modules
//!
//! - [`area`]: the [`PannableArea`] controller
//! - [`axis`]: bounded scroll ranges
//! - [`config`]: tuning parameters loaded from TOML
//! - [`gesture`]: press/drag/release classification
//! - [`velocity`]: drag velocity estimation
//! - [`driver`]: the motion state machine
//! - [`overshoot`]: rubber-band physics
//! - [`indicator`]: scroll indicator fades and geometry
//! - [`surface`]: content surfaces and region hit-testing

pub mod area;
pub mod axis;
pub mod config;
pub mod driver;
pub mod error;
pub mod gesture;
pub mod indicator;
pub mod overshoot;
pub mod surface;
pub mod velocity;

pub use area::PannableArea;
pub use axis::{Axes, Axis, ScrollAxis};
pub use config::{MovementMode, PanMode, PannableConfig};
pub use driver::{driver_events, AnimationDriver, DriverState};
pub use error::{ConfigError, PannableError, Result};
pub use gesture::{GestureSample, GestureTracker, Propagation};
pub use indicator::{IndicatorState, ScrollIndicator};
pub use overshoot::{AxisMotion, OvershootState};
pub use surface::{Region, RegionId, RegionTree, ScrollableSurface};
pub use velocity::{VelocityEstimator, VelocityState};

/// Common imports for hosts embedding a pannable area
pub mod prelude {
    pub use crate::area::PannableArea;
    pub use crate::axis::{Axis, ScrollAxis};
    pub use crate::config::{MovementMode, PanMode, PannableConfig};
    pub use crate::driver::DriverState;
    pub use crate::error::{ConfigError, PannableError};
    pub use crate::gesture::Propagation;
    pub use crate::overshoot::OvershootState;
    pub use crate::surface::{RegionId, RegionTree, ScrollableSurface};
    pub use pannable_core::events::event_types;
    pub use pannable_core::{Event, EventData, MovementDirection};
}
