//! Error types for drawing operations.

use thiserror::Error;

/// Errors reported by the drawing widget.
///
/// None of these are fatal: the widget state is left unchanged whenever one
/// is returned.
#[derive(Debug, Error)]
pub enum DrawError {
    #[error("Could not find tool with selector \"{0}\"")]
    UnknownTool(String),
    #[error("Invalid CSS color: {0}")]
    InvalidColor(String),
    #[error("Invalid stroke width: {0}")]
    InvalidStrokeWidth(f64),
    #[error("Invalid scale factors: {0} x {1}")]
    InvalidScale(f64, f64),
    #[error("Snapshot serialization error: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Result type for drawing operations.
pub type DrawResult<T> = Result<T, DrawError>;
