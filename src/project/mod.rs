//! Project persistence and import.
//!
//! Serializes the full data model (plus the base image payload and
//! presentation parameters) into per-project files with locking, optional
//! compression, and atomic writes, and normalizes external payloads into the
//! canonical document through one import seam.

pub mod import;
pub mod snapshot;
pub mod store;

pub use import::{ImportOutcome, import_json};
pub use snapshot::{CURRENT_VERSION, ProjectSnapshot, SavedProject};
pub use store::{
    CompressionMode, ProjectMeta, StoreOptions, delete_project, list_projects, load_project,
    save_project,
};
