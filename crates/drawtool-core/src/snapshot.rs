//! Saving and loading the surface.
//!
//! The background image is kept out of the regular object deserialization:
//! `load` strips it from the snapshot and issues a fresh load request for its
//! `src`, carrying the stored placement along.

use crate::background::{BackgroundImage, BackgroundPlacement, BackgroundRequest, Origin};
use crate::error::{DrawError, DrawResult};
use crate::shapes::Shape;
use crate::surface::Surface;
use serde::{Deserialize, Serialize};
use kurbo::Size;
use serde_json::Value;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

const BACKGROUND_KEY: &str = "backgroundImage";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotOut<'a> {
    version: u32,
    objects: Vec<&'a Shape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    background_image: Option<&'a BackgroundImage>,
}

/// Stored background fields other than `src`. Anything missing falls back
/// to a centered image at its natural size.
#[derive(Deserialize)]
struct StoredPlacement {
    #[serde(default)]
    origin: Origin,
    #[serde(default)]
    left: Option<f64>,
    #[serde(default)]
    top: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
}

impl StoredPlacement {
    fn resolve(self, surface: Size) -> BackgroundPlacement {
        let centered = BackgroundPlacement::centered(surface);
        BackgroundPlacement {
            origin: self.origin,
            left: self.left.unwrap_or(centered.left),
            top: self.top.unwrap_or(centered.top),
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Deserialize)]
struct SnapshotIn {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    objects: Vec<Shape>,
}

/// Serialize the persistent objects and background of a surface.
pub fn save(surface: &Surface) -> DrawResult<String> {
    let snapshot = SnapshotOut {
        version: SNAPSHOT_VERSION,
        objects: surface.persistent_objects().collect(),
        background_image: surface.background(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Replace the surface content with a snapshot.
///
/// The surface is untouched if the snapshot fails to parse. When the
/// snapshot has a background image, the returned request must be completed
/// by the host once the image has loaded.
pub fn load(surface: &mut Surface, json: &str) -> DrawResult<Option<BackgroundRequest>> {
    let mut state: Value = serde_json::from_str(json)?;
    let map = state
        .as_object_mut()
        .ok_or_else(|| DrawError::InvalidSnapshot("expected a JSON object".to_string()))?;
    let background = match map.remove(BACKGROUND_KEY) {
        None | Some(Value::Null) => None,
        Some(value) => Some(split_background(value)?),
    };

    let snapshot: SnapshotIn = serde_json::from_value(state)?;
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(DrawError::InvalidSnapshot(format!(
            "unsupported version {}",
            snapshot.version
        )));
    }

    surface.replace_objects(snapshot.objects);
    surface.clear_background();
    let request = background.map(|(src, stored)| {
        let placement = stored.resolve(surface.size());
        surface.begin_background_load(src, placement)
    });
    surface.render_all();
    Ok(request)
}

/// Separate a stored background image into its source and placement.
fn split_background(mut value: Value) -> DrawResult<(String, StoredPlacement)> {
    let map = value
        .as_object_mut()
        .ok_or_else(|| DrawError::InvalidSnapshot("background image is not an object".to_string()))?;
    let src = match map.remove("src") {
        Some(Value::String(src)) => src,
        _ => {
            return Err(DrawError::InvalidSnapshot(
                "background image has no src".to_string(),
            ));
        }
    };
    let placement = serde_json::from_value(value)?;
    Ok((src, placement))
}
