//! Export error taxonomy.

use thiserror::Error;

/// Errors surfaced by the export pipeline.
///
/// Every failed export reports exactly one of these and leaves no partial
/// artifact behind. Geometry problems never reach this type (invalid gestures
/// are absorbed upstream), and a report photo that fails to decode is logged
/// and skipped rather than raised.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to decode base image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode bitmap output: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Drawing backend error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface pixel access failed: {0}")]
    Surface(String),

    #[error("Failed to write export artifact: {0}")]
    Io(#[from] std::io::Error),
}
