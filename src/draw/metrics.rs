//! Marker sizing derived from the base image resolution.

/// Linear sizes for every annotation element, in base-image pixels.
///
/// All sizes derive from a single base unit (1/50th of the image width)
/// multiplied by the operator's marker-scale factor, never by screen zoom.
/// This keeps exports at native resolution visually identical to the live
/// view at any zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerMetrics {
    /// Base unit: image width / 50.
    pub base: f64,
    /// User-drawn line stroke width.
    pub line_width: f64,
    /// Leader line stroke width.
    pub leader_width: f64,
    /// Radius of the filled dot at a leader line's target end.
    pub target_radius: f64,
    /// Badge pill height (minimum width as well; the pill widens with text).
    pub badge_height: f64,
    /// Badge border stroke width.
    pub badge_border: f64,
    /// Typology font size inside the badge.
    pub badge_font: f64,
    /// Appendix (sequence number) font size.
    pub appendix_font: f64,
    /// Appendix border stroke width.
    pub appendix_border: f64,
}

impl MarkerMetrics {
    /// Derives metrics for an image of the given pixel width.
    pub fn for_image(image_width: f64, marker_scale: f64) -> Self {
        let base = image_width / 50.0;
        Self {
            base,
            line_width: base * 0.15,
            leader_width: base * 0.10,
            target_radius: base * 0.15,
            badge_height: base * 1.2 * marker_scale,
            badge_border: base * 0.05,
            badge_font: base * 0.6 * marker_scale,
            appendix_font: base * 0.45 * marker_scale,
            appendix_border: base * 0.03,
        }
    }

    /// Hit radius around the badge center, in image pixels.
    pub fn badge_hit_radius(&self) -> f64 {
        self.badge_height / 2.0
    }

    /// Hit radius around a leader target dot, slightly padded for touch.
    pub fn target_hit_radius(&self) -> f64 {
        self.target_radius * 2.0
    }

    /// Hit distance for user-drawn lines.
    pub fn line_hit_radius(&self) -> f64 {
        (self.line_width / 2.0).max(self.base * 0.2)
    }
}
