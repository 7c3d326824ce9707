//! Free-drawn line segments and their fixed color palette.

use crate::draw::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed palette for user-drawn lines.
///
/// Serialized as hex strings, so line colors round-trip existing project
/// files unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LineColor {
    #[default]
    #[serde(rename = "#dc2626")]
    Red,
    #[serde(rename = "#2563eb")]
    Blue,
    #[serde(rename = "#06b6d4")]
    Cyan,
    #[serde(rename = "#16a34a")]
    Green,
    #[serde(rename = "#f97316")]
    Orange,
}

impl LineColor {
    /// All palette entries in display order.
    pub const ALL: [LineColor; 5] = [
        LineColor::Red,
        LineColor::Blue,
        LineColor::Cyan,
        LineColor::Green,
        LineColor::Orange,
    ];

    /// The RGBA color used for stroking.
    pub fn color(self) -> Color {
        match self {
            LineColor::Red => Color::from_rgb_u8(0xdc, 0x26, 0x26),
            LineColor::Blue => Color::from_rgb_u8(0x25, 0x63, 0xeb),
            LineColor::Cyan => Color::from_rgb_u8(0x06, 0xb6, 0xd4),
            LineColor::Green => Color::from_rgb_u8(0x16, 0xa3, 0x4a),
            LineColor::Orange => Color::from_rgb_u8(0xf9, 0x73, 0x16),
        }
    }
}

/// A free-drawn segment between two positions, percent coordinates.
///
/// Lines carry no sequence number; deleting one simply removes the entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLine {
    pub id: Uuid,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub color: LineColor,
}

impl MapLine {
    pub fn new(start_x: f64, start_y: f64, end_x: f64, end_y: f64, color: LineColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_x,
            start_y,
            end_x,
            end_y,
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_color_round_trips_hex_strings() {
        for color in LineColor::ALL {
            let json = serde_json::to_string(&color).unwrap();
            let back: LineColor = serde_json::from_str(&json).unwrap();
            assert_eq!(back, color);
        }
        assert_eq!(serde_json::to_string(&LineColor::Red).unwrap(), "\"#dc2626\"");
    }

    #[test]
    fn unknown_hex_is_rejected() {
        let result: Result<LineColor, _> = serde_json::from_str("\"#123456\"");
        assert!(result.is_err());
    }

    #[test]
    fn line_serializes_camel_case() {
        let line = MapLine::new(1.0, 2.0, 3.0, 4.0, LineColor::Green);
        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"startX\":1.0"));
        assert!(json.contains("\"endY\":4.0"));
    }
}
