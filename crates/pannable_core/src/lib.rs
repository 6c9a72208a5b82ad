//! Pannable Core
//!
//! Foundational primitives shared by the pannable crates:
//!
//! - **Event Dispatch**: typed notifications with synchronous handlers
//! - **State Machines**: transition tables for controller states
//!
//! # Example
//!
//! ```rust
//! use pannable_core::events::{event_types, Event, EventDispatcher};
//!
//! let mut dispatcher = EventDispatcher::new();
//! dispatcher.register(event_types::PANNING_STARTED, |event| event.cancel());
//!
//! let mut event = Event::signal(event_types::PANNING_STARTED, 0.0);
//! dispatcher.dispatch(&mut event);
//! assert!(event.cancelled);
//! ```

pub mod events;
pub mod fsm;

pub use events::{
    Axis, Event, EventBatch, EventData, EventDispatcher, EventType, MovementDirection,
};
pub use fsm::{transition, EventId, StateTransitions};
