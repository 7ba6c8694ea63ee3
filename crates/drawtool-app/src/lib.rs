//! Drawtool Application
//!
//! Hosts the drawing widget: a script replayer for native builds and a
//! JavaScript-facing wrapper for the browser.

pub mod replay;

pub use replay::{Command, ReplayError, Script};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{WebDrawingTool, run_wasm};
