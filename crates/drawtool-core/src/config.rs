//! Widget configuration.

use crate::error::DrawResult;
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Default surface width.
pub const DEFAULT_WIDTH: f64 = 700.0;
/// Default surface height.
pub const DEFAULT_HEIGHT: f64 = 500.0;
/// Default stroke width for shapes and the brush.
pub const DEFAULT_STROKE_WIDTH: f64 = 10.0;
/// Default stroke color for shapes and the brush.
pub const DEFAULT_STROKE_COLOR: &str = "rgba(100,200,200,.75)";
/// Releases closer than this to the press point count as clicks.
pub const MIN_DRAG_DISTANCE: f64 = 3.0;

/// Options for a drawing widget. Missing fields take their defaults, so a
/// partial JSON object merges over the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawingToolConfig {
    pub width: f64,
    pub height: f64,
    pub stroke_width: f64,
    pub stroke_color: String,
    /// CSS fill color; empty for no fill.
    pub fill: String,
    pub min_drag_distance: f64,
    /// Whether the input device is touch-capable (larger selection handles).
    pub touch_supported: bool,
}

impl Default for DrawingToolConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            fill: String::new(),
            min_drag_distance: MIN_DRAG_DISTANCE,
            touch_supported: false,
        }
    }
}

impl DrawingToolConfig {
    /// Parse options from JSON, filling in defaults for anything missing.
    pub fn from_json(json: &str) -> DrawResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_merge_over_defaults() {
        let config = DrawingToolConfig::from_json(r#"{"width": 1024, "touchSupported": true}"#).unwrap();
        assert!((config.width - 1024.0).abs() < f64::EPSILON);
        assert!((config.height - DEFAULT_HEIGHT).abs() < f64::EPSILON);
        assert!(config.touch_supported);
        assert_eq!(config.stroke_color, DEFAULT_STROKE_COLOR);
        assert!((config.min_drag_distance - MIN_DRAG_DISTANCE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(DrawingToolConfig::from_json("{}").unwrap(), DrawingToolConfig::default());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(DrawingToolConfig::from_json("{width: }").is_err());
    }
}
