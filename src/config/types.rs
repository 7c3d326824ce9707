//! Configuration section types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_marker_scale() -> f64 {
    1.0
}

fn default_jpeg_quality() -> u8 {
    92
}

fn default_supersample() -> u32 {
    2
}

fn default_compression() -> String {
    "auto".to_string()
}

fn default_compress_threshold_kb() -> u64 {
    256
}

/// Marker presentation defaults.
#[derive(Debug, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Initial marker-scale multiplier for new projects (0.5 - 3.0).
    #[serde(default = "default_marker_scale")]
    pub default_scale: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            default_scale: default_marker_scale(),
        }
    }
}

/// Raster export tuning.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    /// JPEG quality for the flattened image export (1 - 100).
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Supersampling multiplier over the base image resolution (1 - 4).
    #[serde(default = "default_supersample")]
    pub supersample: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            supersample: default_supersample(),
        }
    }
}

/// Project store location and compression policy.
#[derive(Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Project directory; defaults to the platform data dir when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Compression policy: "off", "on", or "auto".
    #[serde(default = "default_compression")]
    pub compression: String,
    /// Auto mode compresses files at or above this size (KiB).
    #[serde(default = "default_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: None,
            compression: default_compression(),
            auto_compress_threshold_kb: default_compress_threshold_kb(),
        }
    }
}
