//! Export pipeline: flattened bitmap and paginated vector report.
//!
//! Both consumers render through [`crate::draw::compose`], so exported output
//! matches the on-screen composition exactly. Exports operate on a cloned
//! document snapshot taken when the call begins; edits made afterwards never
//! alter an already-produced artifact. A failed export surfaces exactly one
//! [`ExportError`] and leaves no partial file.

pub mod error;
pub mod pdf;
pub mod photo;
pub mod raster;

// Re-export commonly used types at module level
pub use error::ExportError;
pub use pdf::export_pdf;
pub use raster::{RasterOptions, export_jpeg, render_composition};
