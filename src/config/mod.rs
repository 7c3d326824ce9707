//! Configuration file support for planscriber.
//!
//! This module handles loading and validating user settings from the
//! configuration file located at `~/.config/planscriber/config.toml`.
//! Settings include marker presentation defaults, export tuning, and the
//! project store location.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

// Re-export commonly used types at module level
pub use types::{ExportConfig, MarkerConfig, StorageConfig};

use crate::export::RasterOptions;
use crate::project::{CompressionMode, StoreOptions};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [markers]
/// default_scale = 1.2
///
/// [export]
/// jpeg_quality = 92
/// supersample = 2
///
/// [storage]
/// compression = "auto"
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Marker presentation defaults
    #[serde(default)]
    pub markers: MarkerConfig,

    /// Export tuning
    #[serde(default)]
    pub export: ExportConfig,

    /// Project store settings
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is
    /// logged.
    ///
    /// Validated ranges:
    /// - `markers.default_scale`: 0.5 - 3.0
    /// - `export.jpeg_quality`: 1 - 100
    /// - `export.supersample`: 1 - 4
    fn validate_and_clamp(&mut self) {
        if !(0.5..=3.0).contains(&self.markers.default_scale) {
            log::warn!(
                "Invalid default_scale {:.1}, clamping to 0.5-3.0 range",
                self.markers.default_scale
            );
            self.markers.default_scale = self.markers.default_scale.clamp(0.5, 3.0);
        }

        if !(1..=100).contains(&self.export.jpeg_quality) {
            log::warn!(
                "Invalid jpeg_quality {}, clamping to 1-100 range",
                self.export.jpeg_quality
            );
            self.export.jpeg_quality = self.export.jpeg_quality.clamp(1, 100);
        }

        if !(1..=4).contains(&self.export.supersample) {
            log::warn!(
                "Invalid supersample {}, clamping to 1-4 range",
                self.export.supersample
            );
            self.export.supersample = self.export.supersample.clamp(1, 4);
        }

        if !matches!(self.storage.compression.as_str(), "off" | "on" | "auto") {
            log::warn!(
                "Unknown storage compression '{}', falling back to 'auto'",
                self.storage.compression
            );
            self.storage.compression = "auto".to_string();
        }
    }

    /// Returns the default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("planscriber").join("config.toml"))
    }

    /// Loads the configuration from the default location.
    ///
    /// Missing file is not an error: defaults apply.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                debug!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Loads and validates the configuration from an explicit path.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate_and_clamp();
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Store options derived from the storage section.
    pub fn store_options(&self) -> StoreOptions {
        let defaults = StoreOptions::default();
        StoreOptions {
            base_dir: self
                .storage
                .directory
                .clone()
                .unwrap_or(defaults.base_dir),
            compression: match self.storage.compression.as_str() {
                "off" => CompressionMode::Off,
                "on" => CompressionMode::On,
                _ => CompressionMode::Auto,
            },
            auto_compress_threshold_bytes: self.storage.auto_compress_threshold_kb * 1024,
            max_file_size_bytes: defaults.max_file_size_bytes,
        }
    }

    /// Raster export options derived from the export section.
    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            supersample: self.export.supersample,
            jpeg_quality: self.export.jpeg_quality,
        }
    }
}
