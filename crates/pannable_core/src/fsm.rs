//! State transition tables
//!
//! Flat state machines whose transitions are a pure function of the
//! current state and an event id. Implement [`StateTransitions`] on a
//! state enum and drive it with [`transition`].

use std::hash::Hash;

/// Identifier for an event fed to a state machine
pub type EventId = u32;

/// Trait for state types that can handle event transitions
///
/// # Example
///
/// ```
/// use pannable_core::fsm::{transition, StateTransitions};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// const PUSH: u32 = 1;
///
/// impl StateTransitions for Door {
///     fn on_event(&self, event: u32) -> Option<Self> {
///         match (self, event) {
///             (Door::Open, PUSH) => Some(Door::Closed),
///             (Door::Closed, PUSH) => Some(Door::Open),
///             _ => None,
///         }
///     }
/// }
///
/// let mut door = Door::Open;
/// assert!(transition(&mut door, PUSH));
/// assert_eq!(door, Door::Closed);
/// ```
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventId) -> Option<Self>;
}

/// Feed an event to a state, updating it in place.
///
/// Returns true if the state changed.
pub fn transition<S: StateTransitions>(state: &mut S, event: EventId) -> bool {
    match state.on_event(event) {
        Some(next) if next != *state => {
            tracing::debug!(from = ?state, to = ?next, event, "state transition");
            *state = next;
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: u8 = 0;
    const BUSY: u8 = 1;

    const START: EventId = 1;
    const STOP: EventId = 2;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Job(u8);

    impl StateTransitions for Job {
        fn on_event(&self, event: EventId) -> Option<Self> {
            match (self.0, event) {
                (IDLE, START) => Some(Job(BUSY)),
                (BUSY, STOP) => Some(Job(IDLE)),
                (BUSY, START) => Some(Job(BUSY)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_simple_transitions() {
        let mut job = Job(IDLE);
        assert!(transition(&mut job, START));
        assert_eq!(job, Job(BUSY));
        assert!(transition(&mut job, STOP));
        assert_eq!(job, Job(IDLE));
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut job = Job(IDLE);
        assert!(!transition(&mut job, STOP));
        assert_eq!(job, Job(IDLE));
    }

    #[test]
    fn test_self_transition_reports_unchanged() {
        let mut job = Job(BUSY);
        assert!(!transition(&mut job, START));
        assert_eq!(job, Job(BUSY));
    }
}
