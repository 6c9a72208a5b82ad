//! Event dispatch system
//!
//! Typed notifications emitted by the pannable controller. Handlers are
//! registered per event type and invoked synchronously, in registration
//! order, right after the mutation they describe.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    /// A scroll axis value changed
    pub const VALUE_CHANGED: EventType = 30;
    /// The overshoot distance of either axis changed
    pub const OVERSHOOT_CHANGED: EventType = 31;
    /// Scroll indicator alpha or visibility changed
    pub const INDICATOR_CHANGED: EventType = 32;

    /// First drag detected as mostly horizontal
    pub const HORIZONTAL_MOVEMENT: EventType = 40;
    /// First drag detected as mostly vertical
    pub const VERTICAL_MOVEMENT: EventType = 41;

    /// Panning is about to start (cancellable)
    pub const PANNING_STARTED: EventType = 50;
    /// Panning or kinetic motion has finished
    pub const PANNING_FINISHED: EventType = 51;
}

/// One of the two scroll axes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Direction of the initial drag, in content terms
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MovementDirection {
    Up,
    Down,
    Left,
    Right,
}

/// A pannable event with associated data
#[derive(Clone, Debug)]
pub struct Event {
    pub event_type: EventType,
    pub data: EventData,
    /// Frame or pointer time in milliseconds
    pub timestamp: f64,
    pub cancelled: bool,
}

/// Event-specific data
#[derive(Clone, Debug, PartialEq)]
pub enum EventData {
    Value {
        axis: Axis,
        value: f64,
    },
    Overshoot {
        x: f64,
        y: f64,
    },
    Indicator {
        alpha: f64,
        horizontal: bool,
        vertical: bool,
    },
    Movement {
        direction: MovementDirection,
        initial_x: f64,
        initial_y: f64,
    },
    None,
}

impl Event {
    pub fn new(event_type: EventType, data: EventData, timestamp: f64) -> Self {
        Self {
            event_type,
            data,
            timestamp,
            cancelled: false,
        }
    }

    /// Event with no payload
    pub fn signal(event_type: EventType, timestamp: f64) -> Self {
        Self::new(event_type, EventData::None, timestamp)
    }

    /// Cancel the event. Remaining handlers are skipped and the emitter
    /// may veto the action the event announced.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}

/// Events collected during one operation, dispatched once it completes
pub type EventBatch = SmallVec<[Event; 4]>;

/// Event handler function type
pub type EventHandler = Box<dyn FnMut(&mut Event) + Send>;

/// Dispatches events to registered handlers
pub struct EventDispatcher {
    handlers: FxHashMap<EventType, Vec<EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register an event handler for an event type
    pub fn register<F>(&mut self, event_type: EventType, handler: F)
    where
        F: FnMut(&mut Event) + Send + 'static,
    {
        self.handlers
            .entry(event_type)
            .or_default()
            .push(Box::new(handler));
    }

    /// Check whether anything listens for an event type
    pub fn has_handlers(&self, event_type: EventType) -> bool {
        self.handlers
            .get(&event_type)
            .is_some_and(|handlers| !handlers.is_empty())
    }

    /// Remove all handlers for an event type
    pub fn clear(&mut self, event_type: EventType) {
        self.handlers.remove(&event_type);
    }

    /// Dispatch an event to all registered handlers
    pub fn dispatch(&mut self, event: &mut Event) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type) {
            for handler in handlers.iter_mut() {
                if event.cancelled {
                    break;
                }
                handler(event);
            }
        }
    }

    /// Dispatch a batch in order
    pub fn dispatch_batch(&mut self, batch: EventBatch) {
        for mut event in batch {
            self.dispatch(&mut event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::event_types::*;
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();

        let first = seen.clone();
        dispatcher.register(VALUE_CHANGED, move |_| first.lock().unwrap().push(1));
        let second = seen.clone();
        dispatcher.register(VALUE_CHANGED, move |_| second.lock().unwrap().push(2));

        let mut event = Event::new(
            VALUE_CHANGED,
            EventData::Value {
                axis: Axis::Vertical,
                value: 10.0,
            },
            0.0,
        );
        dispatcher.dispatch(&mut event);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_cancel_skips_remaining_handlers() {
        let calls = Arc::new(Mutex::new(0));
        let mut dispatcher = EventDispatcher::new();

        dispatcher.register(PANNING_STARTED, |event| event.cancel());
        let calls_clone = calls.clone();
        dispatcher.register(PANNING_STARTED, move |_| {
            *calls_clone.lock().unwrap() += 1;
        });

        let mut event = Event::signal(PANNING_STARTED, 0.0);
        dispatcher.dispatch(&mut event);

        assert!(event.cancelled);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_unrelated_handlers_not_called() {
        let calls = Arc::new(Mutex::new(0));
        let mut dispatcher = EventDispatcher::new();
        let calls_clone = calls.clone();
        dispatcher.register(PANNING_FINISHED, move |_| {
            *calls_clone.lock().unwrap() += 1;
        });

        let mut batch = EventBatch::new();
        batch.push(Event::signal(PANNING_STARTED, 0.0));
        batch.push(Event::signal(PANNING_FINISHED, 1.0));
        dispatcher.dispatch_batch(batch);

        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(dispatcher.has_handlers(PANNING_FINISHED));
        dispatcher.clear(PANNING_FINISHED);
        assert!(!dispatcher.has_handlers(PANNING_FINISHED));
    }
}
