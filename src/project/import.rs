//! Import normalization seam.
//!
//! Every external payload enters the core through this single step, which
//! produces a canonical [`Document`]. Two shapes are accepted:
//! - the native full-snapshot JSON (object with a `points` array),
//! - a flat list of row records (array of objects with number/typology/
//!   description but no coordinates), which gets laid out on a deterministic
//!   grid so the operator can drag points into place afterwards.

use super::snapshot::ProjectSnapshot;
use crate::model::Document;
use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Grid layout for coordinate-less row records, in percent units.
const GRID_COLUMNS: usize = 5;
const GRID_ORIGIN_X: f64 = 10.0;
const GRID_ORIGIN_Y: f64 = 10.0;
const GRID_STEP_X: f64 = 20.0;
const GRID_STEP_Y: f64 = 15.0;
const GRID_MAX_Y: f64 = 95.0;

/// The normalized result of an import.
#[derive(Debug)]
pub struct ImportOutcome {
    pub document: Document,
    /// Name of the base image the snapshot references, when it carries one.
    /// The image itself arrives separately.
    pub image_name: Option<String>,
}

/// One record of the coordinate-less report format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlatRow {
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    typology: Option<String>,
    #[serde(default, alias = "notes")]
    description: Option<String>,
}

/// Parses an external JSON payload into a canonical document.
pub fn import_json(json: &str) -> Result<ImportOutcome> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("import payload is not valid JSON")?;

    match &value {
        serde_json::Value::Object(map) if map.contains_key("points") => {
            let snapshot: ProjectSnapshot = serde_json::from_value(value)
                .context("failed to parse native project snapshot")?;
            let image_name = if snapshot.image_name.is_empty() {
                None
            } else {
                Some(snapshot.image_name.clone())
            };
            Ok(ImportOutcome {
                document: snapshot.into_document(),
                image_name,
            })
        }
        serde_json::Value::Array(_) => {
            let rows: Vec<FlatRow> =
                serde_json::from_value(value).context("failed to parse flat row records")?;
            Ok(ImportOutcome {
                document: document_from_rows(rows),
                image_name: None,
            })
        }
        _ => bail!("unrecognized import payload: expected a project snapshot or a record list"),
    }
}

/// Places coordinate-less rows onto the deterministic grid.
///
/// Rows are ordered by their declared number when every record carries one,
/// otherwise file order is kept; either way the resulting points are
/// renumbered densely from 1.
fn document_from_rows(mut rows: Vec<FlatRow>) -> Document {
    if rows.iter().all(|row| row.number.is_some()) {
        rows.sort_by_key(|row| row.number.unwrap_or(u32::MAX));
    }

    let mut doc = Document::new();
    for (index, row) in rows.into_iter().enumerate() {
        let column = index % GRID_COLUMNS;
        let grid_row = index / GRID_COLUMNS;
        let x = GRID_ORIGIN_X + column as f64 * GRID_STEP_X;
        let y = (GRID_ORIGIN_Y + grid_row as f64 * GRID_STEP_Y).min(GRID_MAX_Y);

        let id = doc.add_point_at(x, y);
        if let Some(point) = doc.point_mut(id) {
            point.typology = row.typology.unwrap_or_default();
            point.description = row.description.unwrap_or_default();
        }
    }
    doc
}
