//! Headless scenario runner
//!
//! Drives a [`PannableArea`] with a [`ManualClock`] through the steps of a
//! [`Scenario`] and collects a JSON-serializable report.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use pannable_animation::ManualClock;
use pannable_area::{PannableArea, PannableConfig, Propagation, RegionId, RegionTree};
use pannable_core::events::{event_types, EventType};
use serde::Serialize;
use tracing::{debug, info};

use crate::scenario::{Scenario, ScenarioStep};

const RECORDED_EVENTS: [EventType; 7] = [
    event_types::VALUE_CHANGED,
    event_types::OVERSHOOT_CHANGED,
    event_types::INDICATOR_CHANGED,
    event_types::HORIZONTAL_MOVEMENT,
    event_types::VERTICAL_MOVEMENT,
    event_types::PANNING_STARTED,
    event_types::PANNING_FINISHED,
];

fn event_name(event_type: EventType) -> &'static str {
    match event_type {
        event_types::VALUE_CHANGED => "value_changed",
        event_types::OVERSHOOT_CHANGED => "overshoot_changed",
        event_types::INDICATOR_CHANGED => "indicator_changed",
        event_types::HORIZONTAL_MOVEMENT => "horizontal_movement",
        event_types::VERTICAL_MOVEMENT => "vertical_movement",
        event_types::PANNING_STARTED => "panning_started",
        event_types::PANNING_FINISHED => "panning_finished",
        _ => "other",
    }
}

/// Result of a full scenario run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub horizontal: f64,
    pub vertical: f64,
    pub overshoot_x: f64,
    pub overshoot_y: f64,
    pub state: String,
    /// Ticks delivered to the area
    pub frames: u32,
    /// Clock time at the end of the run, in milliseconds
    pub elapsed_ms: f64,
    pub steps: Vec<StepReport>,
    /// Emitted events keyed by name
    pub events: BTreeMap<String, u32>,
}

/// State after one scenario step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: &'static str,
    pub time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub propagation: Option<&'static str>,
    /// Child index hit by a `child_at` step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit: Option<usize>,
    pub horizontal: f64,
    pub vertical: f64,
    pub state: String,
}

fn propagation_name(propagation: Propagation) -> &'static str {
    if propagation.is_consumed() {
        "consumed"
    } else {
        "pass-through"
    }
}

/// Run a scenario to completion
pub fn run(scenario: &Scenario, config: PannableConfig) -> Result<Report> {
    let mut tree = RegionTree::new(scenario.content.width, scenario.content.height);
    let root = tree.root();
    let mut children: Vec<RegionId> = Vec::with_capacity(scenario.content.children.len());
    for child in &scenario.content.children {
        if let Some(id) = tree.add_child(root, child.x, child.y, child.width, child.height) {
            children.push(id);
        }
    }

    let mut area = PannableArea::new(config)?;
    let clock = ManualClock::new();
    area.attach_clock(clock.clone());
    area.set_viewport_size(scenario.viewport.width, scenario.viewport.height);
    area.attach_surface(tree);

    let counts: Arc<Mutex<BTreeMap<String, u32>>> = Arc::new(Mutex::new(BTreeMap::new()));
    for event_type in RECORDED_EVENTS {
        let counts = counts.clone();
        area.on(event_type, move |event| {
            if let Ok(mut counts) = counts.lock() {
                *counts
                    .entry(event_name(event.event_type).to_string())
                    .or_insert(0) += 1;
            }
        });
    }

    let mut frames = 0u32;
    let mut steps = Vec::with_capacity(scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        let now = clock.now();
        let mut propagation = None;
        let mut hit = None;

        match step {
            ScenarioStep::Press { x, y } => {
                propagation = Some(area.on_press(*x, *y, now));
            }
            ScenarioStep::Motion { x, y } => {
                propagation = Some(area.on_motion(*x, *y, now));
            }
            ScenarioStep::Release { x, y } => {
                propagation = Some(area.on_release(*x, *y, now));
            }
            ScenarioStep::Advance { ms } => clock.advance(*ms),
            ScenarioStep::Tick { frames: count, frame_ms } => {
                for _ in 0..*count {
                    clock.advance(*frame_ms);
                    area.tick();
                    frames += 1;
                }
            }
            ScenarioStep::Settle {
                frame_ms,
                max_frames,
            } => {
                let mut ticked = 0;
                while area.needs_ticks() {
                    if ticked >= *max_frames {
                        bail!("step {index}: area still moving after {max_frames} frames");
                    }
                    clock.advance(*frame_ms);
                    area.tick();
                    ticked += 1;
                }
                frames += ticked;
                debug!("settled after {} frames", ticked);
            }
            ScenarioStep::ScrollTo { x, y } => area.scroll_to(*x, *y),
            ScenarioStep::JumpTo { x, y } => area.jump_to(*x, *y),
            ScenarioStep::ScrollToChild { child } => {
                area.scroll_to_child(child_id(&children, *child, index)?)?;
            }
            ScenarioStep::JumpToChild { child } => {
                area.jump_to_child(child_id(&children, *child, index)?)?;
            }
            ScenarioStep::ChildAt { x, y } => {
                hit = area
                    .child_at(*x, *y)?
                    .and_then(|id| children.iter().position(|c| *c == id));
            }
        }

        steps.push(StepReport {
            step: step.kind(),
            time_ms: clock.now(),
            propagation: propagation.map(propagation_name),
            hit,
            horizontal: area.hadjustment().value(),
            vertical: area.vadjustment().value(),
            state: format!("{:?}", area.state()),
        });
    }

    let overshoot = area.overshoot();
    let events = counts.lock().map(|c| c.clone()).unwrap_or_default();

    info!(
        "scenario finished: h={:.2} v={:.2} after {} frames",
        area.hadjustment().value(),
        area.vadjustment().value(),
        frames
    );

    Ok(Report {
        horizontal: area.hadjustment().value(),
        vertical: area.vadjustment().value(),
        overshoot_x: overshoot.overshoot_x,
        overshoot_y: overshoot.overshoot_y,
        state: format!("{:?}", area.state()),
        frames,
        elapsed_ms: clock.now(),
        steps,
        events,
    })
}

fn child_id(children: &[RegionId], child: usize, step: usize) -> Result<RegionId> {
    match children.get(child) {
        Some(id) => Ok(*id),
        None => bail!(
            "step {step}: child {child} out of range ({} children)",
            children.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_list() -> &'static str {
        r#"{
            "viewport": { "width": 400, "height": 400 },
            "content": {
                "width": 400,
                "height": 4000,
                "children": [
                    { "x": 0, "y": 0, "width": 400, "height": 100 },
                    { "x": 0, "y": 2000, "width": 400, "height": 100 }
                ]
            },
            "steps": []
        }"#
    }

    fn with_steps(steps: &str) -> Scenario {
        let mut scenario = Scenario::from_json(long_list()).unwrap();
        let parsed: Vec<ScenarioStep> = serde_json::from_str(steps).unwrap();
        scenario.steps = parsed;
        scenario
    }

    #[test]
    fn test_jump_to_reports_final_value() {
        let scenario = with_steps(r#"[{ "type": "jump_to", "y": 600 }]"#);
        let report = run(&scenario, PannableConfig::default()).unwrap();
        assert_eq!(report.vertical, 600.0);
        assert_eq!(report.frames, 0);
        assert_eq!(report.state, "Idle");
        assert!(report.events.get("value_changed").copied().unwrap_or(0) >= 1);
    }

    #[test]
    fn test_scroll_to_settles_on_target() {
        let scenario = with_steps(
            r#"[{ "type": "scroll_to", "y": 900 }, { "type": "settle" }]"#,
        );
        let report = run(&scenario, PannableConfig::default()).unwrap();
        assert_eq!(report.vertical, 900.0);
        assert!(report.frames > 0);
        assert_eq!(report.steps[0].state, "AnimatingToTarget");
        assert_eq!(report.state, "Idle");
    }

    #[test]
    fn test_swipe_scrolls_content_down() {
        let scenario = with_steps(
            r#"[
                { "type": "press", "x": 200, "y": 350 },
                { "type": "advance", "ms": 10 },
                { "type": "motion", "x": 200, "y": 320 },
                { "type": "advance", "ms": 40 },
                { "type": "motion", "x": 200, "y": 200 },
                { "type": "advance", "ms": 50 },
                { "type": "motion", "x": 200, "y": 50 },
                { "type": "advance", "ms": 5 },
                { "type": "release", "x": 200, "y": 50 },
                { "type": "settle" }
            ]"#,
        );
        let report = run(&scenario, PannableConfig::default()).unwrap();
        assert_eq!(report.steps[8].vertical, 270.0);
        assert!(report.vertical > 270.0);
        assert_eq!(report.overshoot_y, 0.0);
        assert_eq!(report.events.get("panning_started"), Some(&1));
        assert_eq!(report.events.get("panning_finished"), Some(&1));
        assert_eq!(report.steps[0].propagation, Some("pass-through"));
        assert_eq!(report.steps[8].propagation, Some("consumed"));
    }

    #[test]
    fn test_child_at_maps_back_to_index() {
        let scenario = with_steps(
            r#"[
                { "type": "jump_to_child", "child": 1 },
                { "type": "child_at", "x": 10, "y": 210 }
            ]"#,
        );
        let report = run(&scenario, PannableConfig::default()).unwrap();
        assert_eq!(report.vertical, 1800.0);
        assert_eq!(report.steps[1].hit, Some(1));
    }

    #[test]
    fn test_missing_child_is_an_error() {
        let scenario = with_steps(r#"[{ "type": "scroll_to_child", "child": 7 }]"#);
        let err = run(&scenario, PannableConfig::default()).unwrap_err();
        assert!(err.to_string().contains("child 7 out of range"));
    }
}
