//! Public configuration surface and the per-render owner snapshot.

use super::layout_result::{ColumnCount, LayoutResult};
use super::responsive::ResponsiveValue;
use serde::{Deserialize, Serialize};

/// User-facing masonry configuration.
///
/// `spacing` and `default_spacing` are factors of the theme spacing unit.
/// `default_*` values feed the static layout used before any measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MasonryProps {
    /// Number of columns. Defaults to 4.
    pub columns: ResponsiveValue<ColumnCount>,
    /// Space between items in theme units. Defaults to 1.
    pub spacing: ResponsiveValue<f64>,
    /// Column count of the static pre-measurement layout.
    pub default_columns: Option<ColumnCount>,
    /// Container height (px) of the static pre-measurement layout.
    pub default_height: Option<f64>,
    /// Spacing of the static pre-measurement layout.
    pub default_spacing: Option<f64>,
}

impl Default for MasonryProps {
    fn default() -> Self {
        Self {
            columns: ResponsiveValue::Scalar(ColumnCount::default()),
            spacing: ResponsiveValue::Scalar(1.0),
            default_columns: None,
            default_height: None,
            default_spacing: None,
        }
    }
}

impl MasonryProps {
    /// Static defaults, present only when all three are configured.
    pub fn ssr_defaults(&self) -> Option<SsrDefaults> {
        Some(SsrDefaults {
            columns: self.default_columns?,
            height: self.default_height?,
            spacing: self.default_spacing?,
        })
    }

    /// Layout state to start from before the first measurement.
    pub fn initial_layout(&self) -> LayoutResult {
        LayoutResult::initial(self.ssr_defaults().map(|d| d.columns))
    }
}

/// The three defaults used by the static pre-measurement layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsrDefaults {
    /// Placeholder column count.
    pub columns: ColumnCount,
    /// Placeholder container height (px).
    pub height: f64,
    /// Placeholder spacing (raw px).
    pub spacing: f64,
}

/// Snapshot composed from the latest props and the latest committed layout.
///
/// Built fresh on every render; never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerState {
    /// Responsive column count.
    pub columns: ResponsiveValue<ColumnCount>,
    /// Responsive spacing in theme units.
    pub spacing: ResponsiveValue<f64>,
    /// Tallest measured column, if any.
    pub max_column_height: Option<f64>,
    /// Placeholder column count.
    pub default_columns: Option<ColumnCount>,
    /// Placeholder container height.
    pub default_height: Option<f64>,
    /// Placeholder spacing.
    pub default_spacing: Option<f64>,
    /// True exactly when nothing has been measured yet and all defaults exist.
    pub is_ssr: bool,
}

impl OwnerState {
    /// Snapshot of `props` under `layout`.
    pub fn new(props: &MasonryProps, layout: &LayoutResult) -> Self {
        let max_column_height = layout.max_column_height();
        let is_ssr = max_column_height.is_none() && props.ssr_defaults().is_some();
        Self {
            columns: props.columns.clone(),
            spacing: props.spacing.clone(),
            max_column_height,
            default_columns: props.default_columns,
            default_height: props.default_height,
            default_spacing: props.default_spacing,
            is_ssr,
        }
    }

    /// Static defaults when the snapshot is in the pre-measurement regime.
    pub fn ssr_defaults(&self) -> Option<SsrDefaults> {
        if !self.is_ssr {
            return None;
        }
        Some(SsrDefaults {
            columns: self.default_columns?,
            height: self.default_height?,
            spacing: self.default_spacing?,
        })
    }
}
