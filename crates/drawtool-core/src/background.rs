//! Background image model and asynchronous load requests.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Which point of the image `left`/`top` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    #[default]
    Center,
    TopLeft,
}

/// The background image of a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundImage {
    /// Source URL (may be a data URL).
    pub src: String,
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub origin: Origin,
}

impl BackgroundImage {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Where a background image goes once it has loaded.
///
/// `width`/`height` of `None` keep the image's natural size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundPlacement {
    #[serde(default)]
    pub origin: Origin,
    pub left: f64,
    pub top: f64,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl BackgroundPlacement {
    /// Center the image on a surface of the given size, keeping its natural size.
    pub fn centered(surface: Size) -> Self {
        Self {
            origin: Origin::Center,
            left: surface.width / 2.0,
            top: surface.height / 2.0,
            width: None,
            height: None,
        }
    }
}

/// A pending background image load.
///
/// The host fetches `src` and hands the request back together with the
/// image's natural size. Requests superseded by a newer background change are
/// ignored on completion.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundRequest {
    pub(crate) generation: u64,
    pub src: String,
    pub placement: BackgroundPlacement,
}

impl BackgroundRequest {
    /// Build the image this request produces for a given natural size.
    pub(crate) fn into_image(self, natural: Size) -> BackgroundImage {
        BackgroundImage {
            src: self.src,
            width: self.placement.width.unwrap_or(natural.width),
            height: self.placement.height.unwrap_or(natural.height),
            left: self.placement.left,
            top: self.placement.top,
            origin: self.placement.origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_placement_uses_natural_size() {
        let request = BackgroundRequest {
            generation: 0,
            src: "bg.png".to_string(),
            placement: BackgroundPlacement::centered(Size::new(700.0, 500.0)),
        };
        let image = request.into_image(Size::new(320.0, 200.0));
        assert_eq!(image.origin, Origin::Center);
        assert!((image.left - 350.0).abs() < f64::EPSILON);
        assert!((image.top - 250.0).abs() < f64::EPSILON);
        assert!((image.width - 320.0).abs() < f64::EPSILON);
        assert!((image.height - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stored_placement_overrides_natural_size() {
        let image = BackgroundImage {
            src: "bg.png".to_string(),
            width: 100.0,
            height: 50.0,
            left: 10.0,
            top: 20.0,
            origin: Origin::TopLeft,
        };
        let request = BackgroundRequest {
            generation: 3,
            src: image.src.clone(),
            placement: BackgroundPlacement {
                origin: Origin::TopLeft,
                left: 10.0,
                top: 20.0,
                width: Some(100.0),
                height: Some(50.0),
            },
        };
        assert_eq!(request.into_image(Size::new(1.0, 1.0)), image);
    }
}
