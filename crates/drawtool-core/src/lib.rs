//! Drawtool Core Library
//!
//! Platform-agnostic model of the drawtool vector drawing widget: a drawing
//! surface, the toolbar of tools that act on it, and snapshot persistence.

pub mod background;
pub mod config;
pub mod drawing;
pub mod error;
pub mod events;
pub mod geometry;
pub mod shapes;
pub mod snapshot;
pub mod surface;
pub mod tools;

pub use background::{BackgroundImage, BackgroundPlacement, BackgroundRequest, Origin};
pub use config::DrawingToolConfig;
pub use drawing::{DrawingTool, ToolChange};
pub use error::{DrawError, DrawResult};
pub use events::{EventKind, Subscription, SurfaceEvent};
pub use shapes::{Shape, ShapeId, ShapeStyle};
pub use surface::Surface;
pub use tools::{Tool, ToolKind};
