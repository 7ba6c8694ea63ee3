//! Scripted replay of widget commands.
//!
//! A script is a JSON document with optional widget options and a list of
//! commands:
//!
//! ```json
//! {
//!   "config": { "width": 400 },
//!   "commands": [
//!     { "op": "chooseTool", "tool": "rect" },
//!     { "op": "drag", "from": [10, 10], "to": [100, 80] }
//!   ]
//! }
//! ```
//!
//! Background images are never fetched; commands that set one carry the
//! image's natural size and complete the load immediately.

use drawtool_core::{DrawError, DrawingTool, DrawingToolConfig};
use kurbo::{Point, Size};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors that stop a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Command {index} failed: {source}")]
    Command {
        index: usize,
        #[source]
        source: DrawError,
    },
}

/// One widget operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    ChooseTool {
        tool: String,
    },
    PointerDown {
        x: f64,
        y: f64,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    PointerUp {
        x: f64,
        y: f64,
    },
    /// Press, move and release in one step.
    Drag {
        from: [f64; 2],
        to: [f64; 2],
    },
    SelectAt {
        x: f64,
        y: f64,
    },
    ScaleSelection {
        sx: f64,
        sy: f64,
    },
    SetStrokeColor {
        color: String,
    },
    SetStrokeWidth {
        width: f64,
    },
    SetFill {
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    SetBackgroundImage {
        src: String,
        natural_width: f64,
        natural_height: f64,
    },
    ResizeBackgroundToCanvas,
    ResizeCanvasToBackground,
    Clear {
        #[serde(default)]
        background: bool,
    },
    /// Load a snapshot given inline as JSON.
    Load {
        snapshot: serde_json::Value,
    },
    /// Log every object on the surface.
    Check,
}

/// A replayable script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: DrawingToolConfig,
    #[serde(default)]
    pub commands: Vec<Command>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Run every command against a fresh widget and return it.
    pub fn run(&self) -> Result<DrawingTool, ReplayError> {
        let mut widget = DrawingTool::new(self.config.clone())
            .map_err(|source| ReplayError::Command { index: 0, source })?;
        for (index, command) in self.commands.iter().enumerate() {
            log::debug!("Replaying command {}: {:?}", index, command);
            apply(&mut widget, command).map_err(|source| ReplayError::Command { index, source })?;
        }
        Ok(widget)
    }

    /// Run the script and return the saved snapshot.
    pub fn run_to_snapshot(&self) -> Result<String, ReplayError> {
        let widget = self.run()?;
        widget
            .save()
            .map_err(|source| ReplayError::Command {
                index: self.commands.len(),
                source,
            })
    }
}

fn apply(widget: &mut DrawingTool, command: &Command) -> Result<(), DrawError> {
    match command {
        Command::ChooseTool { tool } => {
            widget.choose_tool(tool)?;
        }
        Command::PointerDown { x, y } => widget.pointer_down(Point::new(*x, *y)),
        Command::PointerMove { x, y } => widget.pointer_move(Point::new(*x, *y)),
        Command::PointerUp { x, y } => widget.pointer_up(Point::new(*x, *y)),
        Command::Drag { from, to } => {
            widget.pointer_down(Point::new(from[0], from[1]));
            widget.pointer_move(Point::new(to[0], to[1]));
            widget.pointer_up(Point::new(to[0], to[1]));
        }
        Command::SelectAt { x, y } => {
            if widget.select_at(Point::new(*x, *y)).is_none() {
                log::debug!("Nothing to select at ({}, {})", x, y);
            }
        }
        Command::ScaleSelection { sx, sy } => {
            widget.scale_selection(*sx, *sy)?;
        }
        Command::SetStrokeColor { color } => widget.set_stroke_color(color)?,
        Command::SetStrokeWidth { width } => widget.set_stroke_width(*width)?,
        Command::SetFill { color } => widget.set_fill(color)?,
        Command::SetBackgroundImage {
            src,
            natural_width,
            natural_height,
        } => {
            let request = widget.set_background_image(src);
            widget.complete_background_load(request, Size::new(*natural_width, *natural_height));
        }
        Command::ResizeBackgroundToCanvas => widget.resize_background_to_canvas(),
        Command::ResizeCanvasToBackground => widget.resize_canvas_to_background(),
        Command::Clear { background } => widget.clear(*background),
        Command::Load { snapshot } => {
            let json = serde_json::to_string(snapshot)?;
            // Nothing is fetched: a background saved without a size loads empty.
            if let Some(request) = widget.load(&json)? {
                widget.complete_background_load(request, Size::ZERO);
            }
        }
        Command::Check => widget.check(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_script_produces_snapshot() {
        let script = Script::from_json(
            r#"{
                "commands": [
                    { "op": "chooseTool", "tool": "rect" },
                    { "op": "drag", "from": [10, 10], "to": [100, 80] },
                    { "op": "chooseTool", "tool": "line" },
                    { "op": "pointerDown", "x": 5, "y": 5 },
                    { "op": "pointerUp", "x": 5, "y": 5 }
                ]
            }"#,
        )
        .unwrap();
        let snapshot: Value = serde_json::from_str(&script.run_to_snapshot().unwrap()).unwrap();
        let objects = snapshot["objects"].as_array().unwrap();
        assert_eq!(objects.len(), 1);
        assert!(snapshot.get("backgroundImage").is_none());
    }

    #[test]
    fn test_click_returns_to_selection() {
        let script = Script::from_json(
            r#"{"commands": [
                { "op": "chooseTool", "tool": "circle" },
                { "op": "pointerDown", "x": 5, "y": 5 },
                { "op": "pointerUp", "x": 6, "y": 5 }
            ]}"#,
        )
        .unwrap();
        let widget = script.run().unwrap();
        assert_eq!(widget.current_tool(), Some(drawtool_core::ToolKind::Select));
        assert!(widget.surface().is_empty());
    }

    #[test]
    fn test_config_is_applied() {
        let script = Script::from_json(r#"{"config": {"width": 320, "height": 240}}"#).unwrap();
        let widget = script.run().unwrap();
        assert_eq!(widget.surface().size(), Size::new(320.0, 240.0));
    }

    #[test]
    fn test_background_survives_load() {
        let first = Script::from_json(
            r#"{"commands": [
                { "op": "setBackgroundImage", "src": "bg.png", "naturalWidth": 300, "naturalHeight": 200 },
                { "op": "resizeCanvasToBackground" }
            ]}"#,
        )
        .unwrap();
        let saved: Value = serde_json::from_str(&first.run_to_snapshot().unwrap()).unwrap();
        assert_eq!(saved["backgroundImage"]["src"], "bg.png");

        let second = Script {
            config: DrawingToolConfig::default(),
            commands: vec![Command::Load { snapshot: saved }],
        };
        let widget = second.run().unwrap();
        let background = widget.surface().background().unwrap();
        assert_eq!(background.size(), Size::new(300.0, 200.0));
        assert!((background.left - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_failing_command_reports_index() {
        let script = Script::from_json(
            r#"{"commands": [
                { "op": "chooseTool", "tool": "line" },
                { "op": "chooseTool", "tool": "lasso" }
            ]}"#,
        )
        .unwrap();
        match script.run() {
            Err(ReplayError::Command { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(source, DrawError::UnknownTool(_)));
            }
            other => panic!("expected command error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unknown_op_is_a_parse_error() {
        let result = Script::from_json(r#"{"commands": [{ "op": "teleport" }]}"#);
        assert!(matches!(result, Err(ReplayError::Parse(_))));
    }
}
