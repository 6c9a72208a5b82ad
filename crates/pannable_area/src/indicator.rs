//! Scroll indicators
//!
//! A single alpha shared by the horizontal and vertical indicators. Any
//! scrolling activity fades them in and restarts the idle timer; once the
//! area has been idle for `scrollbar_fade_delay_ms` they fade out again.

use pannable_core::{transition, EventId, StateTransitions};

use crate::axis::ScrollAxis;

/// Interval between fade-in steps
pub const FADE_IN_STEP_MS: f64 = 50.0;
/// Interval between fade-out steps
pub const FADE_OUT_STEP_MS: f64 = 100.0;
/// Shortest indicator drawn, in pixels
pub const MIN_INDICATOR_LENGTH: f64 = 5.0;

/// Alpha moves in fifths
const ALPHA_LEVELS: u8 = 5;

/// Indicator state machine events
pub mod indicator_events {
    use pannable_core::EventId;

    pub const SHOW: EventId = 200;
    pub const OPAQUE: EventId = 201;
    pub const IDLE_TIMEOUT: EventId = 202;
    pub const TRANSPARENT: EventId = 203;
}

/// Indicator visibility state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IndicatorState {
    #[default]
    Hidden,
    FadingIn,
    Visible,
    FadingOut,
}

impl StateTransitions for IndicatorState {
    fn on_event(&self, event: EventId) -> Option<Self> {
        use indicator_events::*;
        match (self, event) {
            (IndicatorState::Hidden | IndicatorState::FadingOut, SHOW) => {
                Some(IndicatorState::FadingIn)
            }
            (IndicatorState::FadingIn, OPAQUE) => Some(IndicatorState::Visible),
            (IndicatorState::Visible, IDLE_TIMEOUT) => Some(IndicatorState::FadingOut),
            (IndicatorState::FadingOut, TRANSPARENT) => Some(IndicatorState::Hidden),
            _ => None,
        }
    }
}

/// Fade timing and per-axis visibility of the scroll indicators
#[derive(Clone, Debug, Default)]
pub struct ScrollIndicator {
    state: IndicatorState,
    level: u8,
    last_activity: f64,
    last_fade_step: f64,
    horizontal: bool,
    vertical: bool,
}

impl ScrollIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Current opacity in `0.0..=1.0`
    pub fn alpha(&self) -> f64 {
        self.level as f64 / ALPHA_LEVELS as f64
    }

    pub fn horizontal_visible(&self) -> bool {
        self.horizontal
    }

    pub fn vertical_visible(&self) -> bool {
        self.vertical
    }

    /// Whether the indicator still needs frame ticks
    pub fn is_active(&self) -> bool {
        self.state != IndicatorState::Hidden
    }

    /// Recompute which indicators apply. Returns true if either changed.
    pub fn update_visibility(&mut self, horizontal: &ScrollAxis, vertical: &ScrollAxis) -> bool {
        let h = horizontal.is_scrollable();
        let v = vertical.is_scrollable();
        let changed = h != self.horizontal || v != self.vertical;
        self.horizontal = h;
        self.vertical = v;
        changed
    }

    /// Scrolling happened at `now`: show the indicators and restart the idle timer
    pub fn show(&mut self, now: f64) {
        self.last_activity = now;
        if transition(&mut self.state, indicator_events::SHOW) {
            self.last_fade_step = now;
        }
    }

    /// Advance fades to `now`. Returns true if the alpha changed.
    pub fn tick(&mut self, now: f64, fade_delay_ms: f64) -> bool {
        let before = self.level;
        match self.state {
            IndicatorState::Hidden => {}
            IndicatorState::FadingIn => {
                let steps = self.take_steps(now, FADE_IN_STEP_MS);
                self.level = self.level.saturating_add(steps).min(ALPHA_LEVELS);
                if self.level == ALPHA_LEVELS {
                    transition(&mut self.state, indicator_events::OPAQUE);
                }
            }
            IndicatorState::Visible => {
                if now - self.last_activity >= fade_delay_ms {
                    transition(&mut self.state, indicator_events::IDLE_TIMEOUT);
                    self.last_fade_step = now;
                }
            }
            IndicatorState::FadingOut => {
                let steps = self.take_steps(now, FADE_OUT_STEP_MS);
                self.level = self.level.saturating_sub(steps);
                if self.level == 0 {
                    transition(&mut self.state, indicator_events::TRANSPARENT);
                }
            }
        }
        self.level != before
    }

    fn take_steps(&mut self, now: f64, interval: f64) -> u8 {
        let elapsed = now - self.last_fade_step;
        if elapsed < interval {
            return 0;
        }
        let steps = (elapsed / interval).floor();
        self.last_fade_step += steps * interval;
        steps.min(ALPHA_LEVELS as f64) as u8
    }
}

/// Indicator `(length, offset)` along a track of `track_length` pixels
pub fn indicator_geometry(axis: &ScrollAxis, track_length: f64) -> (f64, f64) {
    let track = track_length.max(0.0);
    let content = (axis.upper() - axis.lower()).max(axis.page_size());
    if content <= 0.0 || track == 0.0 {
        return (track, 0.0);
    }

    let length = (axis.page_size() / content * track)
        .max(MIN_INDICATOR_LENGTH)
        .min(track);

    let max_scroll = content - axis.page_size();
    let progress = if max_scroll > 0.0 {
        ((axis.value() - axis.lower()) / max_scroll).clamp(0.0, 1.0)
    } else {
        0.0
    };

    (length, progress * (track - length))
}
