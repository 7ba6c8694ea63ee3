//! Color representation and CSS color parsing.

use crate::error::{DrawError, DrawResult};
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Format as a CSS `rgba()` string.
    pub fn to_css(&self) -> String {
        let alpha = self.a as f64 / 255.0;
        format!("rgba({},{},{},{})", self.r, self.g, self.b, (alpha * 100.0).round() / 100.0)
    }
}

/// Parse a CSS color string.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r,g,b)`, `rgba(r,g,b,a)`,
/// `transparent` and a handful of named colors. An empty string means
/// "no color" and yields `Ok(None)`.
pub fn parse_css_color(css: &str) -> DrawResult<Option<SerializableColor>> {
    let color = css.trim().to_ascii_lowercase();
    if color.is_empty() {
        return Ok(None);
    }
    let invalid = || DrawError::InvalidColor(css.to_string());

    if let Some(hex) = color.strip_prefix('#') {
        return parse_hex(hex).map(Some).ok_or_else(invalid);
    }

    if let Some(args) = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args).map(Some).ok_or_else(invalid);
    }

    let named = match color.as_str() {
        "transparent" => SerializableColor::transparent(),
        "black" => SerializableColor::black(),
        "white" => SerializableColor::white(),
        "red" => SerializableColor::new(255, 0, 0, 255),
        "green" => SerializableColor::new(0, 128, 0, 255),
        "blue" => SerializableColor::new(0, 0, 255, 255),
        "yellow" => SerializableColor::new(255, 255, 0, 255),
        "gray" | "grey" => SerializableColor::new(128, 128, 128, 255),
        _ => return Err(invalid()),
    };
    Ok(Some(named))
}

fn parse_hex(hex: &str) -> Option<SerializableColor> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        3 => Some(SerializableColor::new(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
            255,
        )),
        6 | 8 => Some(SerializableColor::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            if hex.len() == 8 { channel(&hex[6..8])? } else { 255 },
        )),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<SerializableColor> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        Some(v.clamp(0.0, 255.0).round() as u8)
    };
    let alpha = match parts.get(3) {
        Some(a) => {
            let v: f64 = a.parse().ok()?;
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };
    Some(SerializableColor::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}
