//! Annotated point (marker) definition.

use super::photo::PhotoPayload;
use super::typology::sort_typology;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Axis tolerance below which a target is considered to coincide with the
/// badge and no leader line is drawn.
pub const LEADER_TOLERANCE: f64 = 0.1;

/// One annotated location on the plan.
///
/// The badge (displayed label) sits at `(x, y)`; an optional true-location
/// target at `(target_x, target_y)` gets a leader line when it differs from
/// the badge by more than [`LEADER_TOLERANCE`] on either axis. All
/// coordinates are percentages of the unrotated base image, range [0, 100].
///
/// Field names serialize camelCase so snapshots round-trip existing project
/// files (`targetX`, `createdAt`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    /// Opaque unique identifier, immutable.
    pub id: Uuid,
    /// 1-based rank within the ordered point collection; recomputed on
    /// deletion so the sequence stays dense and gapless.
    pub number: u32,
    /// Free-text label, possibly several comma/space/slash-separated tokens.
    #[serde(default)]
    pub typology: String,
    /// Badge X position, percent of image width.
    pub x: f64,
    /// Badge Y position, percent of image height.
    pub y: f64,
    /// True-location X, percent of image width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_x: Option<f64>,
    /// True-location Y, percent of image height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_y: Option<f64>,
    /// Free-text survey notes.
    #[serde(default)]
    pub description: String,
    /// Attached photos in attachment order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<PhotoPayload>,
    /// Creation timestamp, epoch milliseconds, immutable.
    pub created_at: i64,
}

impl MapPoint {
    /// Creates a point with badge and target coinciding at the given position.
    pub fn at(number: u32, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            typology: String::new(),
            x,
            y,
            target_x: Some(x),
            target_y: Some(y),
            description: String::new(),
            images: Vec::new(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Returns the target position when both coordinates are present.
    pub fn target(&self) -> Option<(f64, f64)> {
        match (self.target_x, self.target_y) {
            (Some(tx), Some(ty)) => Some((tx, ty)),
            _ => None,
        }
    }

    /// Whether a leader line connects target to badge.
    ///
    /// True iff a target exists and differs from the badge by more than
    /// [`LEADER_TOLERANCE`] on at least one axis.
    pub fn has_leader_line(&self) -> bool {
        self.target().is_some_and(|(tx, ty)| {
            (tx - self.x).abs() > LEADER_TOLERANCE || (ty - self.y).abs() > LEADER_TOLERANCE
        })
    }

    /// The typology tokens sorted for display, or "-" when the label is empty.
    pub fn display_typology(&self) -> String {
        let sorted = sort_typology(&self.typology);
        if sorted.is_empty() {
            "-".to_string()
        } else {
            sorted
        }
    }
}
