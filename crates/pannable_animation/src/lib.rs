//! Pannable Animation
//!
//! Timing and interpolation primitives for the kinetic pannable area.
//!
//! # Features
//!
//! - **Easing**: curves remapping elapsed-time fractions
//! - **Frame Clock**: monotonic frame timing with begin/end updating hints
//! - **Tweens**: two-axis eased transitions with exact landing on target

pub mod clock;
pub mod easing;
pub mod tween;

pub use clock::{FrameClock, ManualClock, SystemClock};
pub use easing::Easing;
pub use tween::Tween;
