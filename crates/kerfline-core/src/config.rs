//! Engine configuration for Kerfline
//!
//! Provides the tunable numeric settings of the geometry engine and the
//! file handling for them. Supports JSON and TOML files.
//!
//! Settings are grouped by the component that reads them:
//! - Flattening (tolerance, minimum chord count)
//! - Stitching (reduced point precision)
//! - Editing (hit-test threshold)
//! - Corner rounding (slope and seam epsilons, disc resolution)

use crate::error::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Numeric settings shared by the flattening, stitching, editing and
/// corner-rounding components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum chord length used when flattening curves, in output units
    pub tolerance: f64,
    /// Minimum number of chords any curve segment flattens to
    pub min_chords: usize,
    /// Decimal places kept when comparing points for stitching
    pub stitch_precision: u32,
    /// Screen distance (pixels) within which a click hits a segment
    pub hit_threshold_px: f64,
    /// Maximum normalized dot product for a vertex to count as a square corner
    pub corner_slope_epsilon: f64,
    /// Relative growth applied to corner patches to hide boolean seams
    pub corner_seam_epsilon: f64,
    /// Number of polygon segments used for fillet discs
    pub circle_segments: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.01,
            min_chords: 3,
            stitch_precision: 5,
            hit_threshold_px: 4.0,
            corner_slope_epsilon: 0.01,
            corner_seam_epsilon: 1e-4,
            circle_segments: 64,
        }
    }
}

impl EngineConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                reason: e.to_string(),
            })?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                reason: e.to_string(),
            })?
        } else {
            return Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }
            .into());
        };

        config.validate()?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }
            .into());
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tolerance <= 0.0 {
            return Err(invalid("tolerance", "must be > 0"));
        }
        if self.min_chords == 0 {
            return Err(invalid("min_chords", "must be at least 1"));
        }
        if self.stitch_precision > 12 {
            return Err(invalid("stitch_precision", "must be at most 12"));
        }
        if self.hit_threshold_px <= 0.0 {
            return Err(invalid("hit_threshold_px", "must be > 0"));
        }
        if self.corner_slope_epsilon <= 0.0 {
            return Err(invalid("corner_slope_epsilon", "must be > 0"));
        }
        if self.corner_seam_epsilon < 0.0 {
            return Err(invalid("corner_seam_epsilon", "must not be negative"));
        }
        if self.circle_segments < 4 || self.circle_segments % 4 != 0 {
            return Err(invalid(
                "circle_segments",
                "must be a positive multiple of 4",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: &str) -> Error {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
