//! Masonry settings from defaults, a TOML file, the environment and CLI flags.

use crate::layout::ThemeSpacing;
use crate::model::{Breakpoints, ColumnCount, MasonryProps, ResponsiveValue};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Failures while locating or reading the config file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configured path is unusable (for example an empty `MASONRY_CONFIG`).
    #[error("Unusable config path: {0}")]
    InvalidPath(String),

    /// The file exists but could not be read.
    #[error("Cannot read config {}: {reason}", .path.display())]
    ReadError {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error text.
        reason: String,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("Bad config {}: {reason}", .path.display())]
    ParseError {
        /// Offending file.
        path: PathBuf,
        /// Message from the TOML parser.
        reason: String,
    },
}

/// Contents of a masonry config file. Every key is optional.
///
/// Lives at `~/.config/masonry/config.toml`:
///
/// ```toml
/// columns = { base = 1, md = 3 }
/// spacing = 2
/// default_columns = 3
/// default_height = 600
/// default_spacing = 2
/// spacing_unit_px = 4
///
/// [breakpoints]
/// md = 800
///
/// [cell]
/// width = 8
/// height = 16
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Responsive column count.
    #[serde(default)]
    pub columns: Option<ResponsiveValue<ColumnCount>>,

    /// Responsive spacing in theme units.
    #[serde(default)]
    pub spacing: Option<ResponsiveValue<f64>>,

    /// Column count of the static placeholder layout.
    #[serde(default)]
    pub default_columns: Option<ColumnCount>,

    /// Container height (px) of the static placeholder layout.
    #[serde(default)]
    pub default_height: Option<f64>,

    /// Spacing (raw px) of the static placeholder layout.
    #[serde(default)]
    pub default_spacing: Option<f64>,

    /// Pixels per theme spacing unit.
    #[serde(default)]
    pub spacing_unit_px: Option<f64>,

    /// Breakpoint threshold overrides.
    #[serde(default)]
    pub breakpoints: Option<BreakpointsSection>,

    /// Terminal cell size overrides.
    #[serde(default)]
    pub cell: Option<CellSection>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Breakpoint thresholds from TOML; missing entries keep their defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BreakpointsSection {
    /// `sm` threshold in px.
    #[serde(default)]
    pub sm: Option<u32>,
    /// `md` threshold in px.
    #[serde(default)]
    pub md: Option<u32>,
    /// `lg` threshold in px.
    #[serde(default)]
    pub lg: Option<u32>,
    /// `xl` threshold in px.
    #[serde(default)]
    pub xl: Option<u32>,
    /// `2xl` threshold in px.
    #[serde(default, rename = "2xl")]
    pub xxl: Option<u32>,
}

impl BreakpointsSection {
    fn over(&self, base: Breakpoints) -> Breakpoints {
        Breakpoints::new(
            self.sm.unwrap_or(base.sm),
            self.md.unwrap_or(base.md),
            self.lg.unwrap_or(base.lg),
            self.xl.unwrap_or(base.xl),
            self.xxl.unwrap_or(base.xxl),
        )
    }
}

/// Terminal cell size from TOML.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CellSection {
    /// Cell width in px.
    #[serde(default)]
    pub width: Option<f64>,
    /// Cell height in px.
    #[serde(default)]
    pub height: Option<f64>,
}

/// Pixel size of one terminal cell, used to map px geometry onto the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    /// Horizontal px per cell.
    pub width_px: f64,
    /// Vertical px per cell.
    pub height_px: f64,
}

impl CellMetrics {
    /// 8×16 px, a common monospace cell.
    pub const DEFAULT: Self = Self {
        width_px: 8.0,
        height_px: 16.0,
    };

    /// Non-positive or non-finite sizes fall back to the default.
    pub fn new(width_px: f64, height_px: f64) -> Self {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        Self {
            width_px: if valid(width_px) { width_px } else { Self::DEFAULT.width_px },
            height_px: if valid(height_px) { height_px } else { Self::DEFAULT.height_px },
        }
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings after every layer has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Masonry props from every layer.
    pub props: MasonryProps,
    /// Theme spacing scale.
    pub spacing: ThemeSpacing,
    /// Breakpoint thresholds.
    pub breakpoints: Breakpoints,
    /// Terminal cell metrics.
    pub cell: CellMetrics,
    /// Log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            props: MasonryProps::default(),
            spacing: ThemeSpacing::default(),
            breakpoints: Breakpoints::DEFAULT,
            cell: CellMetrics::DEFAULT,
            log_file_path: default_log_path(),
        }
    }
}

/// `masonry.log` under the platform state directory, else in the working directory.
pub fn default_log_path() -> PathBuf {
    dirs::state_dir().map_or_else(
        || PathBuf::from("masonry.log"),
        |dir| dir.join("masonry").join("masonry.log"),
    )
}

/// Read and parse `path`. A missing file yields `Ok(None)`.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
        path: path.clone(),
        reason: source.to_string(),
    })?;

    toml::from_str(&contents)
        .map(Some)
        .map_err(|e| ConfigError::ParseError {
            path,
            reason: e.to_string(),
        })
}

/// `masonry/config.toml` under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("masonry").join("config.toml"))
}

/// Pick the config file to read and load it.
///
/// The first of these wins: `--config`, `MASONRY_CONFIG`, [`default_config_path`].
/// Only the chosen file is consulted, and its absence is not an error.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    let chosen = match (config_path, std::env::var("MASONRY_CONFIG")) {
        (Some(path), _) => Some(path),
        (None, Ok(env_path)) if env_path.is_empty() => {
            return Err(ConfigError::InvalidPath(
                "MASONRY_CONFIG is set but empty".to_string(),
            ));
        }
        (None, Ok(env_path)) => Some(PathBuf::from(env_path)),
        (None, Err(_)) => default_config_path(),
    };

    match chosen {
        Some(path) => load_config_file(path),
        None => Ok(None),
    }
}

/// `MASONRY_COLUMNS` and `MASONRY_SPACING` replace the configured values with
/// scalars. Values that do not parse are logged and skipped.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var("MASONRY_COLUMNS") {
        match raw.parse::<ColumnCount>() {
            Ok(columns) => config.props.columns = ResponsiveValue::Scalar(columns),
            Err(e) => warn!(value = %raw, error = %e, "ignoring MASONRY_COLUMNS"),
        }
    }

    if let Ok(raw) = std::env::var("MASONRY_SPACING") {
        match raw.trim().parse::<f64>() {
            Ok(spacing) if spacing.is_finite() && spacing >= 0.0 => {
                config.props.spacing = ResponsiveValue::Scalar(spacing);
            }
            _ => warn!(value = %raw, "ignoring MASONRY_SPACING"),
        }
    }

    config
}

/// Lay the file's keys over the built-in defaults.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let props = MasonryProps {
        columns: config.columns.unwrap_or(defaults.props.columns),
        spacing: config.spacing.unwrap_or(defaults.props.spacing),
        default_columns: config.default_columns,
        default_height: config.default_height,
        default_spacing: config.default_spacing,
    };

    let cell = config.cell.map_or(defaults.cell, |cell| {
        CellMetrics::new(
            cell.width.unwrap_or(defaults.cell.width_px),
            cell.height.unwrap_or(defaults.cell.height_px),
        )
    });

    ResolvedConfig {
        props,
        spacing: config
            .spacing_unit_px
            .map_or(defaults.spacing, ThemeSpacing::new),
        breakpoints: config
            .breakpoints
            .map_or(defaults.breakpoints, |section| section.over(defaults.breakpoints)),
        cell,
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Flags given on the command line win over every other layer.
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    columns_override: Option<ColumnCount>,
    spacing_override: Option<f64>,
) -> ResolvedConfig {
    if let Some(columns) = columns_override {
        config.props.columns = ResponsiveValue::Scalar(columns);
    }

    if let Some(spacing) = spacing_override {
        config.props.spacing = ResponsiveValue::Scalar(spacing);
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
