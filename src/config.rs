//! Analyzer configuration.
//!
//! Handles loading, validating, and merging `bmp-rank.toml`. User files are
//! sparse: stock defaults are the base layer and only the keys present in the
//! file override them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [analysis]
//! size_mismatch = "warn"   # "warn" or "error"
//!
//! [limits]
//! # max_pixels = 100000000 # Reject larger images (omit for no limit)
//!
//! [dump]
//! enabled = true           # Write a pixel dump per image
//! dir = "pixel-dumps"      # Where dumps go
//!
//! [scan]
//! recursive = false        # Descend into subdirectories of directory inputs
//!
//! [processing]
//! # max_processes = 4      # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::bmp::Limits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file name looked up by [`load_config_from_dir`].
pub const CONFIG_FILENAME: &str = "bmp-rank.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Analyzer configuration loaded from `bmp-rank.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Per-file analysis policy.
    pub analysis: AnalysisConfig,
    /// Decode resource limits.
    pub limits: LimitsConfig,
    /// Pixel dump output.
    pub dump: DumpConfig,
    /// Input expansion.
    pub scan: ScanConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AnalyzerConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dump.enabled && self.dump.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "dump.dir must not be empty when dumps are enabled".into(),
            ));
        }
        if self.limits.max_pixels == Some(0) {
            return Err(ConfigError::Validation(
                "limits.max_pixels must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// What to do when the header's file size disagrees with the real length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMismatchPolicy {
    /// Keep the result and attach a warning.
    #[default]
    Warn,
    /// Fail the file.
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub size_mismatch: SizeMismatchPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum width * height accepted by the decoder. `None` = unlimited.
    pub max_pixels: Option<u64>,
}

impl LimitsConfig {
    pub fn to_limits(&self) -> Limits {
        Limits {
            max_pixels: self.max_pixels,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DumpConfig {
    pub enabled: bool,
    pub dir: PathBuf,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("pixel-dumps"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Walk subdirectories of directory inputs.
    pub recursive: bool,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel decode workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AnalyzerConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AnalyzerConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AnalyzerConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file. A missing file is an error.
pub fn load_config(path: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `bmp-rank.toml` from `dir`, or the stock defaults if there is none.
pub fn load_config_from_dir(dir: &Path) -> Result<AnalyzerConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return resolve_config(None);
    }
    load_config(&path)
}

/// Returns a fully-commented stock `bmp-rank.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# bmp-rank Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Analysis
# ---------------------------------------------------------------------------
[analysis]
# What to do when the file size stored in the BMP header differs from the
# real file length: "warn" keeps the result and reports a warning,
# "error" fails the file.
size_mismatch = "warn"

# ---------------------------------------------------------------------------
# Decode limits
# ---------------------------------------------------------------------------
[limits]
# Reject images with more pixels than this (width * height).
# Omit or comment out for no limit.
# max_pixels = 100000000

# ---------------------------------------------------------------------------
# Pixel dumps
# ---------------------------------------------------------------------------
[dump]
# Write every pixel of every analyzed image to a text file.
enabled = true

# Directory for dump files. Each image gets its own file named
# <index>-<stem>.pixels.txt.
dir = "pixel-dumps"

# ---------------------------------------------------------------------------
# Input scanning
# ---------------------------------------------------------------------------
[scan]
# When an input path is a directory, also collect .bmp files from its
# subdirectories.
recursive = false

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel decode workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
