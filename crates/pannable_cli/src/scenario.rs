//! Scenario definition for headless pannable runs
//!
//! A scenario describes the viewport, the content layout and a sequence
//! of pointer, clock and API steps, in JSON:
//!
//! ```json
//! {
//!   "viewport": { "width": 400, "height": 400 },
//!   "content": { "width": 400, "height": 4000 },
//!   "steps": [
//!     { "type": "press", "x": 200, "y": 350 },
//!     { "type": "advance", "ms": 10 },
//!     { "type": "motion", "x": 200, "y": 300 },
//!     { "type": "release", "x": 200, "y": 300 },
//!     { "type": "settle" }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Full headless run description
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub viewport: Size,
    #[serde(default)]
    pub content: Content,
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Parse a scenario from JSON text
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to parse scenario")
    }

    /// Load a scenario file
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Invalid scenario {}", path.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
        }
    }
}

/// Content rectangle and the child regions placed on it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Content {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub children: Vec<ChildSpec>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
            children: Vec::new(),
        }
    }
}

/// A top-level child region, referenced by its index in `children`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChildSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

fn default_frame_ms() -> f64 {
    16.0
}

fn default_max_frames() -> u32 {
    10_000
}

/// One scenario step. Pointer events happen at the current clock time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Press {
        x: f64,
        y: f64,
    },
    Motion {
        x: f64,
        y: f64,
    },
    Release {
        x: f64,
        y: f64,
    },
    /// Move the clock without ticking
    Advance {
        ms: f64,
    },
    /// Advance and tick `frames` times
    Tick {
        frames: u32,
        #[serde(default = "default_frame_ms")]
        frame_ms: f64,
    },
    /// Tick until the area stops requesting frames
    Settle {
        #[serde(default = "default_frame_ms")]
        frame_ms: f64,
        #[serde(default = "default_max_frames")]
        max_frames: u32,
    },
    ScrollTo {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    JumpTo {
        #[serde(default)]
        x: Option<f64>,
        #[serde(default)]
        y: Option<f64>,
    },
    ScrollToChild {
        child: usize,
    },
    JumpToChild {
        child: usize,
    },
    /// Hit-test a viewport point
    ChildAt {
        x: f64,
        y: f64,
    },
}

impl ScenarioStep {
    /// Short name used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioStep::Press { .. } => "press",
            ScenarioStep::Motion { .. } => "motion",
            ScenarioStep::Release { .. } => "release",
            ScenarioStep::Advance { .. } => "advance",
            ScenarioStep::Tick { .. } => "tick",
            ScenarioStep::Settle { .. } => "settle",
            ScenarioStep::ScrollTo { .. } => "scroll_to",
            ScenarioStep::JumpTo { .. } => "jump_to",
            ScenarioStep::ScrollToChild { .. } => "scroll_to_child",
            ScenarioStep::JumpToChild { .. } => "jump_to_child",
            ScenarioStep::ChildAt { .. } => "child_at",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_scenario() {
        let scenario = Scenario::from_json(
            r#"{
                "viewport": { "width": 320, "height": 480 },
                "content": {
                    "width": 320,
                    "height": 5000,
                    "children": [{ "x": 0, "y": 1200, "width": 320, "height": 60 }]
                },
                "steps": [
                    { "type": "press", "x": 100, "y": 400 },
                    { "type": "tick", "frames": 3 },
                    { "type": "scroll_to", "y": 900 },
                    { "type": "scroll_to_child", "child": 0 },
                    { "type": "settle", "max_frames": 50 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.viewport.height, 480.0);
        assert_eq!(scenario.content.children.len(), 1);
        assert_eq!(
            scenario.steps[1],
            ScenarioStep::Tick {
                frames: 3,
                frame_ms: 16.0
            }
        );
        assert_eq!(
            scenario.steps[2],
            ScenarioStep::ScrollTo {
                x: None,
                y: Some(900.0)
            }
        );
        assert_eq!(
            scenario.steps[4],
            ScenarioStep::Settle {
                frame_ms: 16.0,
                max_frames: 50
            }
        );
        assert_eq!(scenario.steps[3].kind(), "scroll_to_child");
    }

    #[test]
    fn test_defaults_for_viewport_and_content() {
        let scenario = Scenario::from_json(r#"{ "steps": [] }"#).unwrap();
        assert_eq!(scenario.viewport, Size::default());
        assert_eq!(scenario.content, Content::default());
    }

    #[test]
    fn test_unknown_step_rejected() {
        let result = Scenario::from_json(r#"{ "steps": [{ "type": "teleport" }] }"#);
        assert!(result.is_err());
    }
}
