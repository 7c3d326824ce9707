//! Serializable project snapshot types.

use crate::model::{Document, MapLine, MapPoint, PhotoPayload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CURRENT_VERSION: u32 = 1;

fn default_marker_scale() -> f64 {
    1.0
}

/// The portable project state, matching the native snapshot JSON format.
///
/// Field names are camelCase so snapshot files from earlier releases load
/// unchanged and files written here load there.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSnapshot {
    pub version: u32,
    #[serde(default)]
    pub plan_name: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub image_name: String,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_marker_scale")]
    pub marker_scale: f64,
    #[serde(default)]
    pub points: Vec<MapPoint>,
    #[serde(default)]
    pub lines: Vec<MapLine>,
}

impl ProjectSnapshot {
    /// Captures the current document state for persistence or export.
    pub fn from_document(doc: &Document, image_name: impl Into<String>) -> Self {
        Self {
            version: CURRENT_VERSION,
            plan_name: doc.plan_name.clone(),
            floor: doc.floor.clone(),
            image_name: image_name.into(),
            rotation: doc.rotation(),
            marker_scale: doc.marker_scale(),
            points: doc.points.clone(),
            lines: doc.lines.clone(),
        }
    }

    /// Rebuilds a document from the snapshot.
    ///
    /// The base image's pixel dimensions are not part of the snapshot; the
    /// caller sets them once the image payload has been decoded. Points are
    /// re-ranked on entry so the dense-number invariant holds even for files
    /// edited outside this tool.
    pub fn into_document(self) -> Document {
        let mut doc = Document::new();
        doc.plan_name = self.plan_name;
        doc.floor = self.floor;
        doc.set_rotation(self.rotation);
        doc.set_marker_scale(self.marker_scale);

        let mut points = self.points;
        points.sort_by_key(|p| p.number);
        for (index, point) in points.iter_mut().enumerate() {
            point.number = index as u32 + 1;
        }
        doc.points = points;
        doc.lines = self.lines;
        doc
    }
}

/// A stored project: snapshot plus identity and the base image payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProject {
    pub id: Uuid,
    pub last_modified: i64,
    #[serde(flatten)]
    pub snapshot: ProjectSnapshot,
    pub image_data: PhotoPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineColor;

    #[test]
    fn snapshot_round_trips_document_state() {
        let mut doc = Document::with_image_size(800, 600);
        doc.plan_name = "Capannone A".to_string();
        doc.floor = "P1".to_string();
        doc.set_rotation(90.0);
        doc.set_marker_scale(1.4);
        let id = doc.add_point_at(12.0, 34.0);
        doc.point_mut(id).unwrap().typology = "3, 1".to_string();
        doc.add_line((1.0, 1.0), (9.0, 9.0), LineColor::Orange);

        let snapshot = ProjectSnapshot::from_document(&doc, "plan.png");
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: ProjectSnapshot = serde_json::from_str(&json).unwrap();
        let back = restored.into_document();

        assert_eq!(back.plan_name, "Capannone A");
        assert_eq!(back.rotation(), 90.0);
        assert_eq!(back.marker_scale(), 1.4);
        assert_eq!(back.points.len(), 1);
        assert_eq!(back.points[0].typology, "3, 1");
        assert_eq!(back.lines.len(), 1);
        assert_eq!(back.lines[0].color, LineColor::Orange);
    }

    #[test]
    fn into_document_restores_dense_numbering() {
        let mut snapshot = ProjectSnapshot {
            version: CURRENT_VERSION,
            plan_name: String::new(),
            floor: String::new(),
            image_name: String::new(),
            rotation: 0.0,
            marker_scale: 1.0,
            points: vec![MapPoint::at(7, 1.0, 1.0), MapPoint::at(3, 2.0, 2.0)],
            lines: Vec::new(),
        };
        snapshot.points[0].number = 7;
        snapshot.points[1].number = 3;

        let doc = snapshot.into_document();
        let numbers: Vec<u32> = doc.points.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        // Lowest incoming number comes first
        assert_eq!(doc.points[0].x, 2.0);
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{"version": 1, "points": []}"#;
        let snapshot: ProjectSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.marker_scale, 1.0);
        assert_eq!(snapshot.rotation, 0.0);
        assert!(snapshot.lines.is_empty());
    }
}
