//! The pannable area controller
//!
//! [`PannableArea`] turns pointer input and frame ticks into scroll
//! positions. It owns the two axes and composes the gesture tracker,
//! velocity estimator, animation driver and indicators. Listeners receive
//! typed events synchronously once each operation has finished mutating
//! state.
//!
//! # Example
//!
//! ```rust
//! use pannable_animation::ManualClock;
//! use pannable_area::prelude::*;
//!
//! let clock = ManualClock::new();
//! let mut area = PannableArea::default();
//! area.attach_clock(clock.clone());
//! area.set_viewport_size(400.0, 400.0);
//! area.attach_surface(RegionTree::new(400.0, 1000.0));
//!
//! area.scroll_to(None, Some(800.0));
//! while area.tick() {
//!     clock.advance(16.0);
//! }
//! assert_eq!(area.vadjustment().value(), 600.0);
//! ```

use pannable_animation::{FrameClock, Tween};
use pannable_core::events::event_types::*;
use pannable_core::{Event, EventBatch, EventData, EventDispatcher, EventType, MovementDirection};

use crate::axis::{Axes, Axis, ScrollAxis};
use crate::config::{PanMode, PannableConfig};
use crate::driver::{AnimationDriver, DriverState, Physics};
use crate::error::{ConfigError, PannableError, Result};
use crate::gesture::{GestureTracker, MotionOutcome, Propagation};
use crate::indicator::{indicator_geometry, ScrollIndicator};
use crate::overshoot::{drag_axis, OvershootState};
use crate::surface::{RegionId, ScrollableSurface};
use crate::velocity::{accel_target, VelocityEstimator, VelocityState};

/// Observable state compared before and after each operation
#[derive(Clone, Copy, Debug, PartialEq)]
struct Snapshot {
    h: f64,
    v: f64,
    overshoot_x: f64,
    overshoot_y: f64,
}

/// Kinetic scrolling controller for one content surface
pub struct PannableArea {
    config: PannableConfig,
    axes: Axes,
    viewport: (f64, f64),
    gesture: GestureTracker,
    velocity: VelocityEstimator,
    overshoot: OvershootState,
    driver: AnimationDriver,
    indicator: ScrollIndicator,
    clock: Option<Box<dyn FrameClock>>,
    surface: Option<Box<dyn ScrollableSurface>>,
    dispatcher: EventDispatcher,
    pending: EventBatch,
    /// Panning started and `PANNING_FINISHED` is still owed
    session_open: bool,
    /// Focused child waiting for the current drag to end
    pending_focus: Option<RegionId>,
}

impl Default for PannableArea {
    fn default() -> Self {
        Self::with_valid_config(PannableConfig::default())
    }
}

impl PannableArea {
    /// Create a controller, rejecting invalid configuration
    pub fn new(config: PannableConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: PannableConfig) -> Self {
        Self {
            config,
            axes: Axes::default(),
            viewport: (0.0, 0.0),
            gesture: GestureTracker::new(),
            velocity: VelocityEstimator::new(),
            overshoot: OvershootState::default(),
            driver: AnimationDriver::new(),
            indicator: ScrollIndicator::new(),
            clock: None,
            surface: None,
            dispatcher: EventDispatcher::new(),
            pending: EventBatch::new(),
            session_open: false,
            pending_focus: None,
        }
    }

    // =========================================================================
    // Configuration and collaborators
    // =========================================================================

    pub fn config(&self) -> &PannableConfig {
        &self.config
    }

    /// Replace the configuration. Disabling the area stops all motion.
    pub fn set_config(&mut self, config: PannableConfig) -> std::result::Result<(), ConfigError> {
        config.validate()?;
        let before = self.snapshot();
        let now = self.now(0.0);

        if !config.enabled {
            self.driver.halt(self.velocity.state_mut());
            self.gesture = GestureTracker::new();
            self.overshoot.reset();
            self.pending_focus = None;
        }
        for axis in [Axis::Horizontal, Axis::Vertical] {
            let max = config.overshoot_max(axis);
            let overshoot = self.overshoot.axis_mut(axis);
            *overshoot.distance = overshoot.distance.clamp(-max, max);
        }
        self.config = config;
        self.finish_operation(before, now);
        Ok(())
    }

    /// Register a listener for an event type
    pub fn on<F>(&mut self, event_type: EventType, handler: F)
    where
        F: FnMut(&mut Event) + Send + 'static,
    {
        self.dispatcher.register(event_type, handler);
    }

    /// Attach the frame clock that drives animation
    pub fn attach_clock<C: FrameClock + 'static>(&mut self, clock: C) {
        if let Some(mut previous) = self.clock.take() {
            previous.end_updating();
        }
        self.clock = Some(Box::new(clock));
        self.sync_updating();
    }

    /// Detach the frame clock. Running motion completes immediately.
    pub fn detach_clock(&mut self) -> Option<Box<dyn FrameClock>> {
        let mut clock = self.clock.take();
        if let Some(clock) = clock.as_mut() {
            clock.end_updating();
        }
        if self.driver.is_active() {
            let before = self.snapshot();
            let (driver, mut phys) = self.split();
            driver.settle(&mut phys);
            self.finish_operation(before, 0.0);
        }
        clock
    }

    /// Attach the content surface and size the axes from it
    pub fn attach_surface<S: ScrollableSurface + 'static>(&mut self, surface: S) {
        self.surface = Some(Box::new(surface));
        self.refresh_content();

        if self.config.initial_hint && self.axes.any_scrollable() {
            if let Some(now) = self.clock_time() {
                self.indicator.show(now);
                self.sync_updating();
            }
        }
    }

    pub fn detach_surface(&mut self) -> Option<Box<dyn ScrollableSurface>> {
        let surface = self.surface.take();
        self.refresh_content();
        surface
    }

    pub fn surface(&self) -> Option<&dyn ScrollableSurface> {
        self.surface.as_deref()
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport = (width.max(0.0), height.max(0.0));
        self.refresh_content();
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        self.viewport
    }

    /// Re-read the content size and re-clamp both axes
    pub fn refresh_content(&mut self) {
        let before = self.snapshot();
        let (width, height) = self
            .surface
            .as_ref()
            .map(|surface| surface.content_size())
            .unwrap_or((0.0, 0.0));

        self.axes.horizontal.set_range(0.0, width, self.viewport.0);
        self.axes.vertical.set_range(0.0, height, self.viewport.1);

        if self
            .indicator
            .update_visibility(&self.axes.horizontal, &self.axes.vertical)
        {
            self.push_indicator_event(self.now(0.0));
        }
        let now = self.now(0.0);
        self.finish_operation(before, now);
    }

    // =========================================================================
    // State queries
    // =========================================================================

    pub fn hadjustment(&self) -> &ScrollAxis {
        &self.axes.horizontal
    }

    pub fn vadjustment(&self) -> &ScrollAxis {
        &self.axes.vertical
    }

    pub fn axis(&self, axis: Axis) -> &ScrollAxis {
        self.axes.get(axis)
    }

    pub fn overshoot(&self) -> OvershootState {
        self.overshoot
    }

    pub fn velocity(&self) -> VelocityState {
        *self.velocity.state()
    }

    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    /// Whether motion is fast enough that a press would be intercepted
    pub fn is_fast(&self) -> bool {
        self.velocity.is_fast(&self.config)
    }

    /// Whether the controller currently wants frame ticks
    pub fn needs_ticks(&self) -> bool {
        self.driver.is_active() || self.indicator.is_active()
    }

    pub fn is_updating(&self) -> bool {
        self.clock.as_ref().is_some_and(|clock| clock.is_updating())
    }

    /// A drag is in progress
    pub fn is_panning(&self) -> bool {
        self.gesture.is_dragging()
    }

    pub fn indicator(&self) -> &ScrollIndicator {
        &self.indicator
    }

    /// Indicator `(length, offset)` for an axis along a track
    pub fn indicator_geometry(&self, axis: Axis, track_length: f64) -> (f64, f64) {
        indicator_geometry(self.axes.get(axis), track_length)
    }

    // =========================================================================
    // Positioning
    // =========================================================================

    /// Set one axis directly, clamped
    pub fn set_value(&mut self, axis: Axis, value: f64) {
        let before = self.snapshot();
        self.axes.get_mut(axis).set_value(value);
        let now = self.now(0.0);
        self.finish_operation(before, now);
    }

    /// Animate so the given content point is centered. `None` leaves an
    /// axis where it is.
    pub fn scroll_to(&mut self, x: Option<f64>, y: Option<f64>) {
        let Some(target) = self.centered_target(x, y) else {
            return;
        };

        let now = match self.clock_time() {
            Some(now)
                if self.config.mode != PanMode::Push && self.config.scroll_duration_ms > 0.0 =>
            {
                now
            }
            _ => {
                self.jump_to_target(target);
                return;
            }
        };

        if self.driver.state() == DriverState::AnimatingToTarget {
            if self.driver.target() == Some(target) {
                return;
            }
        } else if self.driver.state().is_idle()
            && !self.overshoot.any()
            && self.axes.values() == target
        {
            return;
        }

        let before = self.snapshot();
        self.velocity.state_mut().reset();
        self.overshoot.reset();
        self.driver.start_tween(Tween::new(
            self.axes.values(),
            target,
            now,
            self.config.scroll_duration_ms,
            self.config.scroll_easing,
        ));
        tracing::debug!(?target, "scroll to");
        self.finish_operation(before, now);
    }

    /// Center the given content point immediately
    pub fn jump_to(&mut self, x: Option<f64>, y: Option<f64>) {
        if let Some(target) = self.centered_target(x, y) {
            self.jump_to_target(target);
        }
    }

    /// Animate so a child's top-left corner is centered
    pub fn scroll_to_child(&mut self, child: RegionId) -> Result<()> {
        let (x, y) = self.child_position(child)?;
        self.scroll_to(Some(x), Some(y));
        Ok(())
    }

    /// Center a child's top-left corner immediately
    pub fn jump_to_child(&mut self, child: RegionId) -> Result<()> {
        let (x, y) = self.child_position(child)?;
        self.jump_to(Some(x), Some(y));
        Ok(())
    }

    /// Report that keyboard focus moved to `child`.
    ///
    /// With `center_on_child_focus` the child is scrolled to the center of
    /// the viewport. During a drag the scroll waits for the release.
    pub fn set_focus_child(&mut self, child: RegionId) -> Result<()> {
        if !self.config.center_on_child_focus {
            return Ok(());
        }
        self.child_position(child)?;
        if self.gesture.is_dragging() {
            tracing::debug!(?child, "focus centering deferred until release");
            self.pending_focus = Some(child);
            return Ok(());
        }
        self.scroll_to_child(child)
    }

    /// Child under a viewport point, accounting for scroll and overshoot
    pub fn child_at(&self, x: f64, y: f64) -> Result<Option<RegionId>> {
        let surface = self.surface.as_ref().ok_or(PannableError::NoSurface)?;
        let content_x = x + self.axes.horizontal.value() + self.overshoot.overshoot_x;
        let content_y = y + self.axes.vertical.value() + self.overshoot.overshoot_y;
        Ok(surface.child_at(content_x, content_y))
    }

    fn child_position(&self, child: RegionId) -> Result<(f64, f64)> {
        let surface = self.surface.as_ref().ok_or(PannableError::NoSurface)?;
        surface
            .child_position(child)
            .ok_or(PannableError::NotDescendant(child))
    }

    fn centered_target(&self, x: Option<f64>, y: Option<f64>) -> Option<(f64, f64)> {
        if !self.axes.any_scrollable() || (x.is_none() && y.is_none()) {
            return None;
        }
        let h = &self.axes.horizontal;
        let v = &self.axes.vertical;
        Some((
            x.map_or(h.value(), |x| h.centered_target(x)),
            y.map_or(v.value(), |y| v.centered_target(y)),
        ))
    }

    fn jump_to_target(&mut self, target: (f64, f64)) {
        let before = self.snapshot();
        let now = self.now(0.0);
        self.driver.jump();
        self.velocity.state_mut().reset();
        self.overshoot.reset();
        self.axes.horizontal.set_value(target.0);
        self.axes.vertical.set_value(target.1);
        self.finish_operation(before, now);
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Button press at viewport coordinates
    pub fn on_press(&mut self, x: f64, y: f64, time: f64) -> Propagation {
        if !self.config.enabled {
            return Propagation::PassThrough;
        }
        let before = self.snapshot();
        let now = self.now(time);

        // Stopping fast or overshot content must not click through
        let intercept = self.velocity.is_fast(&self.config) || self.overshoot.any();

        self.driver.halt(self.velocity.state_mut());
        self.velocity.reset(time);
        self.gesture.press(x, y, time);
        tracing::debug!(x, y, intercept, "press");

        self.finish_operation(before, now);
        if intercept {
            Propagation::Consumed
        } else {
            Propagation::PassThrough
        }
    }

    /// Pointer motion at viewport coordinates
    pub fn on_motion(&mut self, x: f64, y: f64, time: f64) -> Propagation {
        if !self.config.enabled {
            return Propagation::PassThrough;
        }
        match self.gesture.motion(x, y, time, &self.config) {
            MotionOutcome::Ignored | MotionOutcome::Click | MotionOutcome::Refused => {
                Propagation::PassThrough
            }
            MotionOutcome::Vetoed => Propagation::Consumed,
            MotionOutcome::DragStarted {
                direction, allowed, ..
            } => self.start_drag(direction, allowed, time),
            MotionOutcome::Drag { dx, dy } => {
                self.drag(x, y, dx, dy, time);
                Propagation::Consumed
            }
        }
    }

    /// Button release at viewport coordinates
    pub fn on_release(&mut self, x: f64, y: f64, time: f64) -> Propagation {
        if !self.config.enabled {
            return Propagation::PassThrough;
        }
        let outcome = self.gesture.release(x, y, time);
        if !outcome.was_pressed {
            return Propagation::PassThrough;
        }

        let before = self.snapshot();
        let now = self.now(time);
        let overshooting = self.overshoot.flags();
        let mode = self.config.mode;

        let propagation = if outcome.was_drag {
            if mode != PanMode::Accel {
                let launch = if outcome.stopped || mode == PanMode::Push {
                    (0.0, 0.0)
                } else {
                    self.velocity.launch_velocity(&self.config, overshooting)
                };
                let state = self.velocity.state_mut();
                state.vel_x = launch.0;
                state.vel_y = launch.1;
            }
            tracing::debug!(?mode, velocity = ?self.velocity.state(), "release drag");

            let (driver, mut phys) = self.split();
            if mode == PanMode::Accel {
                driver.release_hold(&mut phys, now);
            }
            if !driver.is_active() || phys.overshoot.any() {
                driver.fling(&mut phys, now);
            }
            Propagation::Consumed
        } else if self.overshoot.any() {
            self.velocity.state_mut().reset();
            let (driver, mut phys) = self.split();
            driver.fling(&mut phys, now);
            Propagation::Consumed
        } else if outcome.vetoed {
            Propagation::Consumed
        } else {
            Propagation::PassThrough
        };

        if self.clock.is_none() {
            let (driver, mut phys) = self.split();
            driver.settle(&mut phys);
        }

        self.finish_operation(before, now);

        if let Some(child) = self.pending_focus.take() {
            if let Err(err) = self.scroll_to_child(child) {
                tracing::debug!(%err, "dropping pending focus child");
            }
        }
        propagation
    }

    fn start_drag(&mut self, direction: MovementDirection, allowed: bool, time: f64) -> Propagation {
        let Some(press) = self.gesture.press_sample() else {
            return Propagation::PassThrough;
        };
        let now = self.now(time);

        let movement = match direction {
            MovementDirection::Up | MovementDirection::Down => VERTICAL_MOVEMENT,
            MovementDirection::Left | MovementDirection::Right => HORIZONTAL_MOVEMENT,
        };
        self.pending.push(Event::new(
            movement,
            EventData::Movement {
                direction,
                initial_x: press.x,
                initial_y: press.y,
            },
            now,
        ));
        self.flush();

        if !allowed {
            return Propagation::PassThrough;
        }

        let mut started = Event::signal(PANNING_STARTED, now);
        self.dispatcher.dispatch(&mut started);
        if started.cancelled {
            tracing::debug!("panning vetoed by listener");
            self.gesture.veto();
            return Propagation::Consumed;
        }

        self.session_open = true;
        if self.config.mode == PanMode::Accel {
            let (h, v) = self.drag_axes();
            self.driver.hold(h, v, now);
        }
        if self.clock.is_some() {
            self.indicator.show(now);
        }
        self.sync_updating();
        Propagation::Consumed
    }

    fn drag(&mut self, x: f64, y: f64, dx: f64, dy: f64, time: f64) {
        let before = self.snapshot();
        let now = self.now(time);
        let (allow_h, allow_v) = self.drag_axes();

        if self.config.mode == PanMode::Accel {
            if let Some(press) = self.gesture.press_sample() {
                // Finger travel maps to content moving the opposite way
                let state = self.velocity.state_mut();
                state.accel_x = if allow_h {
                    -accel_target(x - press.x, self.viewport.0, &self.config)
                } else {
                    0.0
                };
                state.accel_y = if allow_v {
                    -accel_target(y - press.y, self.viewport.1, &self.config)
                } else {
                    0.0
                };
            }
        } else {
            let delta_x = if allow_h { -dx } else { 0.0 };
            let delta_y = if allow_v { -dy } else { 0.0 };
            for (axis, delta) in [(Axis::Horizontal, delta_x), (Axis::Vertical, delta_y)] {
                if delta != 0.0 {
                    drag_axis(
                        self.axes.get_mut(axis),
                        self.overshoot.axis_mut(axis),
                        delta,
                        self.config.overshoot_max(axis),
                    );
                }
            }
            self.velocity.record(delta_x, delta_y, time, &self.config);
        }

        self.finish_operation(before, now);
    }

    /// Axes a drag may move: allowed by the movement mode and scrollable
    fn drag_axes(&self) -> (bool, bool) {
        let mode = self.config.movement_mode;
        (
            mode.allows(Axis::Horizontal) && self.axes.horizontal.is_scrollable(),
            mode.allows(Axis::Vertical) && self.axes.vertical.is_scrollable(),
        )
    }

    // =========================================================================
    // Frame ticks
    // =========================================================================

    /// Advance animations to the clock's current frame time.
    ///
    /// Returns true while further ticks are needed.
    pub fn tick(&mut self) -> bool {
        let Some(now) = self.clock_time() else {
            return false;
        };
        let before = self.snapshot();

        {
            let (driver, mut phys) = self.split();
            driver.tick(&mut phys, now);
        }

        if self
            .indicator
            .tick(now, self.config.scrollbar_fade_delay_ms)
        {
            self.push_indicator_event(now);
        }

        self.finish_operation(before, now);
        self.needs_ticks()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn split(&mut self) -> (&mut AnimationDriver, Physics<'_>) {
        (
            &mut self.driver,
            Physics {
                axes: &mut self.axes,
                velocity: self.velocity.state_mut(),
                overshoot: &mut self.overshoot,
                config: &self.config,
            },
        )
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            h: self.axes.horizontal.value(),
            v: self.axes.vertical.value(),
            overshoot_x: self.overshoot.overshoot_x,
            overshoot_y: self.overshoot.overshoot_y,
        }
    }

    fn clock_time(&self) -> Option<f64> {
        self.clock.as_ref().map(|clock| clock.frame_time())
    }

    /// Clock time when a clock is attached, otherwise `fallback`
    fn now(&self, fallback: f64) -> f64 {
        self.clock_time().unwrap_or(fallback)
    }

    /// Emit change notifications, close finished panning, and keep the
    /// clock's update state in line with what still needs ticks
    fn finish_operation(&mut self, before: Snapshot, now: f64) {
        let after = self.snapshot();

        if after.h != before.h {
            self.push_value_event(Axis::Horizontal, after.h, now);
        }
        if after.v != before.v {
            self.push_value_event(Axis::Vertical, after.v, now);
        }
        let overshoot_moved =
            after.overshoot_x != before.overshoot_x || after.overshoot_y != before.overshoot_y;
        if overshoot_moved {
            self.pending.push(Event::new(
                OVERSHOOT_CHANGED,
                EventData::Overshoot {
                    x: after.overshoot_x,
                    y: after.overshoot_y,
                },
                now,
            ));
        }
        if after != before && self.clock.is_some() {
            self.indicator.show(now);
        }

        if self.driver.is_active() {
            self.session_open = true;
        } else if self.session_open && !self.gesture.is_dragging() {
            self.session_open = false;
            tracing::debug!("panning finished");
            self.pending.push(Event::signal(PANNING_FINISHED, now));
        }

        self.sync_updating();
        self.flush();
    }

    fn push_value_event(&mut self, axis: Axis, value: f64, now: f64) {
        self.pending.push(Event::new(
            VALUE_CHANGED,
            EventData::Value { axis, value },
            now,
        ));
    }

    fn push_indicator_event(&mut self, now: f64) {
        self.pending.push(Event::new(
            INDICATOR_CHANGED,
            EventData::Indicator {
                alpha: self.indicator.alpha(),
                horizontal: self.indicator.horizontal_visible(),
                vertical: self.indicator.vertical_visible(),
            },
            now,
        ));
    }

    fn sync_updating(&mut self) {
        let needs = self.needs_ticks();
        if let Some(clock) = self.clock.as_mut() {
            if needs && !clock.is_updating() {
                tracing::trace!("begin updating");
                clock.begin_updating();
            } else if !needs && clock.is_updating() {
                tracing::trace!("end updating");
                clock.end_updating();
            }
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.pending);
        self.dispatcher.dispatch_batch(batch);
    }
}
