//! Document state: one annotated plan with its presentation parameters.

use super::line::{LineColor, MapLine};
use super::point::MapPoint;
use crate::util::normalize_degrees;
use uuid::Uuid;

/// Marker scale bounds exposed to the operator.
pub const MARKER_SCALE_MIN: f64 = 0.5;
pub const MARKER_SCALE_MAX: f64 = 3.0;

/// The annotation layer for one base image.
///
/// Coordinates in `points` and `lines` are always percentages of the
/// unrotated image's natural dimensions; rotation and zoom are presentation
/// parameters and never mutate stored coordinates. The document is owned by
/// exactly one editing session at a time; exports clone it as a read-only
/// snapshot.
#[derive(Debug, Clone)]
pub struct Document {
    pub plan_name: String,
    pub floor: String,
    image_width: u32,
    image_height: u32,
    rotation: f64,
    marker_scale: f64,
    pub points: Vec<MapPoint>,
    pub lines: Vec<MapLine>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document with no base image attached yet.
    pub fn new() -> Self {
        Self {
            plan_name: String::new(),
            floor: String::new(),
            image_width: 0,
            image_height: 0,
            rotation: 0.0,
            marker_scale: 1.0,
            points: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Creates an empty document for an image of known natural size.
    pub fn with_image_size(width: u32, height: u32) -> Self {
        let mut doc = Self::new();
        doc.set_image_size(width, height);
        doc
    }

    /// Records the base image's natural pixel dimensions.
    ///
    /// Called after the image payload has been decoded (import may arrive
    /// before the image does).
    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_width = width;
        self.image_height = height;
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the presentation rotation, normalized to [0, 360).
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    pub fn marker_scale(&self) -> f64 {
        self.marker_scale
    }

    /// Sets the marker-scale multiplier, clamped to the operator range.
    pub fn set_marker_scale(&mut self, scale: f64) {
        self.marker_scale = scale.clamp(MARKER_SCALE_MIN, MARKER_SCALE_MAX);
    }

    /// Steps the marker scale by a delta (operator +/- control).
    pub fn adjust_marker_scale(&mut self, delta: f64) {
        self.set_marker_scale(self.marker_scale + delta);
    }

    /// Appends a new point at the given badge position and returns its id.
    ///
    /// The new point's number is `count + 1`, keeping the sequence dense.
    pub fn add_point_at(&mut self, x: f64, y: f64) -> Uuid {
        let point = MapPoint::at(self.points.len() as u32 + 1, x, y);
        let id = point.id;
        self.points.push(point);
        id
    }

    /// Removes a point and renumbers the survivors.
    ///
    /// Returns `true` if the point existed. After removal every remaining
    /// point's `number` equals its 1-based list position again.
    pub fn remove_point(&mut self, id: Uuid) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        let removed = self.points.len() != before;
        if removed {
            self.renumber();
        }
        removed
    }

    fn renumber(&mut self) {
        for (index, point) in self.points.iter_mut().enumerate() {
            point.number = index as u32 + 1;
        }
    }

    pub fn point(&self, id: Uuid) -> Option<&MapPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn point_mut(&mut self, id: Uuid) -> Option<&mut MapPoint> {
        self.points.iter_mut().find(|p| p.id == id)
    }

    /// Appends a free-drawn line and returns its id.
    pub fn add_line(&mut self, start: (f64, f64), end: (f64, f64), color: LineColor) -> Uuid {
        let line = MapLine::new(start.0, start.1, end.0, end.1, color);
        let id = line.id;
        self.lines.push(line);
        id
    }

    /// Removes a line. No renumbering applies to lines.
    pub fn remove_line(&mut self, id: Uuid) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    pub fn line(&self, id: Uuid) -> Option<&MapLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Points sorted by their sequence number, for report generation.
    pub fn points_by_number(&self) -> Vec<&MapPoint> {
        let mut sorted: Vec<&MapPoint> = self.points.iter().collect();
        sorted.sort_by_key(|p| p.number);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_point_assigns_dense_numbers() {
        let mut doc = Document::with_image_size(1000, 800);
        doc.add_point_at(10.0, 10.0);
        doc.add_point_at(20.0, 20.0);
        doc.add_point_at(30.0, 30.0);
        let numbers: Vec<u32> = doc.points.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn remove_point_renumbers_survivors() {
        let mut doc = Document::with_image_size(1000, 800);
        doc.add_point_at(10.0, 10.0);
        let middle = doc.add_point_at(20.0, 20.0);
        doc.add_point_at(30.0, 30.0);
        doc.add_point_at(40.0, 40.0);

        assert!(doc.remove_point(middle));

        let numbers: Vec<u32> = doc.points.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        // The former third point moved up
        assert_eq!(doc.points[1].x, 30.0);
    }

    #[test]
    fn remove_point_is_noop_for_unknown_id() {
        let mut doc = Document::with_image_size(1000, 800);
        doc.add_point_at(10.0, 10.0);
        assert!(!doc.remove_point(Uuid::new_v4()));
        assert_eq!(doc.points.len(), 1);
    }

    #[test]
    fn remove_line_does_not_touch_points() {
        let mut doc = Document::with_image_size(1000, 800);
        doc.add_point_at(10.0, 10.0);
        let line = doc.add_line((0.0, 0.0), (5.0, 5.0), LineColor::Blue);
        assert!(doc.remove_line(line));
        assert!(doc.lines.is_empty());
        assert_eq!(doc.points[0].number, 1);
    }

    #[test]
    fn marker_scale_clamps_to_operator_range() {
        let mut doc = Document::new();
        doc.set_marker_scale(10.0);
        assert_eq!(doc.marker_scale(), MARKER_SCALE_MAX);
        doc.adjust_marker_scale(-5.0);
        assert_eq!(doc.marker_scale(), MARKER_SCALE_MIN);
    }

    #[test]
    fn rotation_is_normalized() {
        let mut doc = Document::new();
        doc.set_rotation(-90.0);
        assert_eq!(doc.rotation(), 270.0);
        doc.set_rotation(450.0);
        assert_eq!(doc.rotation(), 90.0);
    }

    #[test]
    fn points_by_number_sorts_ascending() {
        let mut doc = Document::with_image_size(100, 100);
        doc.add_point_at(1.0, 1.0);
        doc.add_point_at(2.0, 2.0);
        doc.points.swap(0, 1);
        let sorted: Vec<u32> = doc.points_by_number().iter().map(|p| p.number).collect();
        assert_eq!(sorted, vec![1, 2]);
    }
}
