//! RGBA color type and the marker theme constants.

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color from 8-bit channel values.
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// The same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

/// Marker theme red (badges, leader lines, appendix borders).
pub const MARKER_RED: Color = Color {
    r: 0xdc as f64 / 255.0,
    g: 0x26 as f64 / 255.0,
    b: 0x26 as f64 / 255.0,
    a: 1.0,
};

/// Predefined white color.
pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

/// Predefined black color.
pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Neutral gray used for report cell borders.
pub const BORDER_GRAY: Color = Color {
    r: 200.0 / 255.0,
    g: 200.0 / 255.0,
    b: 200.0 / 255.0,
    a: 1.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_u8_scales_channels() {
        let color = Color::from_rgb_u8(255, 0, 128);
        assert_eq!(color.r, 1.0);
        assert_eq!(color.g, 0.0);
        assert!((color.b - 128.0 / 255.0).abs() < f64::EPSILON);
        assert_eq!(color.a, 1.0);
    }

    #[test]
    fn with_alpha_preserves_channels() {
        let faded = MARKER_RED.with_alpha(0.8);
        assert_eq!(faded.r, MARKER_RED.r);
        assert_eq!(faded.a, 0.8);
    }
}
