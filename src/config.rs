//! TOML configuration file support for power users.
//!
//! Instead of passing many CLI flags, extractor tuning can live in a config
//! file:
//!
//! ```toml
//! # labnorm.toml
//! [extraction]
//! window_length = 25
//! poly_order = 3
//! peak_height = 0.015
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::bandgap::ExtractorConfig;

/// Root configuration structure for labnorm.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Band-gap extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Overrides for the band-gap extractor; unset keys keep their defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ExtractionConfig {
    /// Savitzky-Golay window length in samples (odd).
    pub window_length: Option<usize>,

    /// Savitzky-Golay polynomial order.
    pub poly_order: Option<usize>,

    /// Minimum edge-strength for a candidate absorption edge.
    pub peak_height: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl ExtractionConfig {
    /// Overlay these settings on `base`, keeping `base` where unset.
    pub fn apply(&self, base: ExtractorConfig) -> ExtractorConfig {
        ExtractorConfig {
            window_length: self.window_length.unwrap_or(base.window_length),
            poly_order: self.poly_order.unwrap_or(base.poly_order),
            peak_height: self.peak_height.unwrap_or(base.peak_height),
        }
    }
}
