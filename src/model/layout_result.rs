//! Committed outcome of a layout pass.

use serde::{Deserialize, Serialize};

/// Number of columns. Always >= 1; zero clamps to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawColumnCount", into = "u16")]
pub struct ColumnCount(u16);

/// Error returned when a column setting is not a number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Column count must be numeric (got {0:?})")]
pub struct InvalidColumnCount(pub String);

impl ColumnCount {
    /// A single column.
    pub const ONE: Self = Self(1);

    /// Clamping constructor: `0` becomes `1`.
    pub fn new(count: u16) -> Self {
        Self(count.max(1))
    }

    /// Clamp an arbitrary measured count (possibly zero, negative or NaN) into range.
    pub fn from_measured(count: f64) -> Self {
        if count.is_finite() && count >= 1.0 {
            Self(count.min(f64::from(u16::MAX)) as u16)
        } else {
            Self::ONE
        }
    }

    /// Count as `u16`.
    pub fn get(&self) -> u16 {
        self.0
    }

    /// Count as `usize`.
    pub fn as_usize(&self) -> usize {
        usize::from(self.0)
    }

    /// Separators needed between columns: `max(count - 1, 0)`.
    pub fn line_breaks(&self) -> usize {
        self.as_usize().saturating_sub(1)
    }
}

impl Default for ColumnCount {
    fn default() -> Self {
        Self(4)
    }
}

impl From<ColumnCount> for u16 {
    fn from(count: ColumnCount) -> Self {
        count.0
    }
}

impl std::fmt::Display for ColumnCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ColumnCount {
    type Err = InvalidColumnCount;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed: f64 = s
            .trim()
            .parse()
            .map_err(|_| InvalidColumnCount(s.to_string()))?;
        Ok(Self::from_measured(parsed.trunc()))
    }
}

/// Columns may be written as a number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawColumnCount {
    Number(f64),
    Text(String),
}

impl TryFrom<RawColumnCount> for ColumnCount {
    type Error = InvalidColumnCount;

    fn try_from(raw: RawColumnCount) -> Result<Self, Self::Error> {
        match raw {
            RawColumnCount::Number(n) => Ok(Self::from_measured(n.trunc())),
            RawColumnCount::Text(s) => s.parse(),
        }
    }
}

/// Result of the most recent successful measurement pass.
///
/// # Invariants
/// - `line_break_count == max(column_count - 1, 0)` (enforced by constructors)
/// - `max_column_height` is `None` until the first committed pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutResult {
    column_count: ColumnCount,
    max_column_height: Option<f64>,
    line_break_count: usize,
}

impl LayoutResult {
    /// State before any measurement.
    ///
    /// When the static pre-measurement layout is active, its column count already
    /// needs separators so the placeholder columns do not merge.
    pub fn initial(ssr_columns: Option<ColumnCount>) -> Self {
        let column_count = ssr_columns.unwrap_or(ColumnCount::ONE);
        Self {
            column_count,
            max_column_height: None,
            line_break_count: column_count.line_breaks(),
        }
    }

    /// Result of a completed pass.
    pub(crate) fn committed(column_count: ColumnCount, max_column_height: f64) -> Self {
        Self {
            column_count,
            max_column_height: Some(max_column_height),
            line_break_count: column_count.line_breaks(),
        }
    }

    /// Effective column count.
    pub fn column_count(&self) -> ColumnCount {
        self.column_count
    }

    /// Tallest column in px, `None` before the first measurement.
    pub fn max_column_height(&self) -> Option<f64> {
        self.max_column_height
    }

    /// Separators needed: one fewer than the columns.
    pub fn line_break_count(&self) -> usize {
        self.line_break_count
    }

    /// True once a measurement pass has been committed.
    pub fn is_measured(&self) -> bool {
        self.max_column_height.is_some()
    }
}

impl Default for LayoutResult {
    fn default() -> Self {
        Self::initial(None)
    }
}
