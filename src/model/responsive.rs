//! Responsive (breakpoint-indexed) configuration values.

use super::breakpoint::{Breakpoint, Breakpoints};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A configuration value that may vary per breakpoint.
///
/// Accepts three shapes, mirroring common style-prop conventions:
///
/// ```
/// # use masonry_layout::model::{Breakpoint, ResponsiveValue};
/// let scalar: ResponsiveValue<u32> = serde_json::from_str("3").unwrap();
/// assert_eq!(scalar, ResponsiveValue::Scalar(3));
///
/// let map: ResponsiveValue<u32> = serde_json::from_str(r#"{"base": 1, "md": 3}"#).unwrap();
/// assert_eq!(map.get(Breakpoint::Md), Some(&3));
///
/// let array: ResponsiveValue<u32> = serde_json::from_str("[1, 2]").unwrap();
/// assert_eq!(array.get(Breakpoint::Sm), Some(&2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsiveValue<T> {
    /// Same value at every breakpoint.
    Scalar(T),
    /// Positional values: index 0 is `base`, 1 is `sm`, and so on.
    Array(Vec<T>),
    /// Explicit values for some breakpoints.
    Breakpoints(BTreeMap<Breakpoint, T>),
}

impl<T> ResponsiveValue<T> {
    /// Value written at exactly this breakpoint, without fallback.
    pub fn get(&self, bp: Breakpoint) -> Option<&T> {
        match self {
            ResponsiveValue::Scalar(value) => (bp == Breakpoint::Base).then_some(value),
            ResponsiveValue::Array(values) => Breakpoint::ALL
                .iter()
                .position(|candidate| *candidate == bp)
                .and_then(|index| values.get(index)),
            ResponsiveValue::Breakpoints(map) => map.get(&bp),
        }
    }

    /// True for the scalar shape.
    pub fn is_scalar(&self) -> bool {
        matches!(self, ResponsiveValue::Scalar(_))
    }

    /// Explicitly written `(breakpoint, value)` pairs in ascending order.
    fn defined(&self) -> Vec<(Breakpoint, &T)> {
        match self {
            ResponsiveValue::Scalar(value) => vec![(Breakpoint::Base, value)],
            ResponsiveValue::Array(values) => Breakpoint::ALL.into_iter().zip(values).collect(),
            ResponsiveValue::Breakpoints(map) => map.iter().map(|(bp, v)| (*bp, v)).collect(),
        }
    }
}

impl<T> From<T> for ResponsiveValue<T> {
    fn from(value: T) -> Self {
        ResponsiveValue::Scalar(value)
    }
}

/// A responsive value after breakpoint resolution.
///
/// `PerBreakpoint` maps every breakpoint from the first defined one up to the
/// last defined one; gaps are filled from the nearest smaller breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    /// Breakpoint-independent value.
    Scalar(T),
    /// Dense per-breakpoint values.
    PerBreakpoint(BTreeMap<Breakpoint, T>),
}

impl<T> Resolved<T> {
    /// Effective value at `bp`: the value at that breakpoint or the nearest smaller one.
    pub fn value_at(&self, bp: Breakpoint) -> Option<&T> {
        match self {
            Resolved::Scalar(value) => Some(value),
            Resolved::PerBreakpoint(map) => map.range(..=bp).next_back().map(|(_, v)| v),
        }
    }

    /// Value at the widest defined breakpoint.
    pub fn last(&self) -> Option<&T> {
        match self {
            Resolved::Scalar(value) => Some(value),
            Resolved::PerBreakpoint(map) => map.values().next_back(),
        }
    }

    /// Breakpoints that carry a value, ascending. A scalar reports `base`.
    pub fn breakpoints(&self) -> Vec<Breakpoint> {
        match self {
            Resolved::Scalar(_) => vec![Breakpoint::Base],
            Resolved::PerBreakpoint(map) => map.keys().copied().collect(),
        }
    }

    /// Apply `f` to every value, keeping the shape.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Resolved<U> {
        match self {
            Resolved::Scalar(value) => Resolved::Scalar(f(value)),
            Resolved::PerBreakpoint(map) => {
                Resolved::PerBreakpoint(map.iter().map(|(bp, v)| (*bp, f(v))).collect())
            }
        }
    }
}

/// Maps a responsive value onto the active breakpoint set.
///
/// Fallback semantics: a breakpoint without its own value takes the value of
/// the nearest smaller breakpoint.
pub trait BreakpointResolver {
    /// Threshold table used for classification and media queries.
    fn breakpoints(&self) -> Breakpoints;

    /// Breakpoint active at the given viewport width.
    fn active(&self, width_px: f64) -> Breakpoint {
        self.breakpoints().classify_width(width_px)
    }

    /// Resolve a responsive value into its dense per-breakpoint form.
    fn resolve<T: Clone>(&self, value: &ResponsiveValue<T>) -> Resolved<T> {
        if let ResponsiveValue::Scalar(value) = value {
            return Resolved::Scalar(value.clone());
        }

        let defined = value.defined();
        let (Some((first, _)), Some((last, _))) = (defined.first(), defined.last()) else {
            return Resolved::PerBreakpoint(BTreeMap::new());
        };

        let mut filled = BTreeMap::new();
        let mut carried: Option<&T> = None;
        for bp in Breakpoint::ALL {
            if bp < *first || bp > *last {
                continue;
            }
            if let Some((_, v)) = defined.iter().find(|(candidate, _)| *candidate == bp) {
                carried = Some(v);
            }
            if let Some(v) = carried {
                filled.insert(bp, v.clone());
            }
        }
        Resolved::PerBreakpoint(filled)
    }
}

impl BreakpointResolver for Breakpoints {
    fn breakpoints(&self) -> Breakpoints {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spacing_scale() -> ResponsiveValue<f64> {
        ResponsiveValue::Breakpoints(BTreeMap::from([
            (Breakpoint::Base, 1.0),
            (Breakpoint::Sm, 2.0),
            (Breakpoint::Md, 3.0),
        ]))
    }

    #[test]
    fn scalar_resolves_to_scalar() {
        let resolved = Breakpoints::DEFAULT.resolve(&ResponsiveValue::Scalar(4u16));
        assert_eq!(resolved, Resolved::Scalar(4));
        assert_eq!(resolved.value_at(Breakpoint::Xxl), Some(&4));
    }

    #[test]
    fn map_uses_exact_breakpoint_value() {
        let resolved = Breakpoints::DEFAULT.resolve(&spacing_scale());
        assert_eq!(resolved.value_at(Breakpoint::Sm), Some(&2.0));
        assert_eq!(resolved.value_at(Breakpoint::Base), Some(&1.0));
    }

    #[test]
    fn wider_breakpoints_fall_back_to_nearest_smaller() {
        let resolved = Breakpoints::DEFAULT.resolve(&spacing_scale());
        assert_eq!(resolved.value_at(Breakpoint::Lg), Some(&3.0));
        assert_eq!(resolved.value_at(Breakpoint::Xxl), Some(&3.0));
    }

    #[test]
    fn gaps_are_filled_from_previous_breakpoint() {
        let value = ResponsiveValue::Breakpoints(BTreeMap::from([
            (Breakpoint::Sm, 2u16),
            (Breakpoint::Lg, 5u16),
        ]));
        let resolved = Breakpoints::DEFAULT.resolve(&value);
        assert_eq!(
            resolved.breakpoints(),
            vec![Breakpoint::Sm, Breakpoint::Md, Breakpoint::Lg]
        );
        assert_eq!(resolved.value_at(Breakpoint::Md), Some(&2));
        assert_eq!(resolved.value_at(Breakpoint::Base), None);
        assert_eq!(resolved.last(), Some(&5));
    }

    #[test]
    fn array_maps_positionally() {
        let resolved = Breakpoints::DEFAULT.resolve(&ResponsiveValue::Array(vec![1u16, 2, 3]));
        assert_eq!(resolved.value_at(Breakpoint::Base), Some(&1));
        assert_eq!(resolved.value_at(Breakpoint::Md), Some(&3));
        assert_eq!(resolved.value_at(Breakpoint::Xl), Some(&3));
    }

    #[test]
    fn empty_map_resolves_to_nothing() {
        let value: ResponsiveValue<u16> = ResponsiveValue::Breakpoints(BTreeMap::new());
        let resolved = Breakpoints::DEFAULT.resolve(&value);
        assert_eq!(resolved.value_at(Breakpoint::Md), None);
        assert_eq!(resolved.last(), None);
    }

    #[test]
    fn deserializes_all_shapes() {
        let scalar: ResponsiveValue<f64> = serde_json::from_str("2").expect("scalar");
        assert!(scalar.is_scalar());

        let map: ResponsiveValue<f64> =
            serde_json::from_str(r#"{"base": 1, "sm": 2, "md": 3}"#).expect("map");
        assert_eq!(map, spacing_scale());

        let array: ResponsiveValue<f64> = serde_json::from_str("[1, 2, 3]").expect("array");
        assert_eq!(array.get(Breakpoint::Md), Some(&3.0));
    }

    #[test]
    fn active_breakpoint_follows_thresholds() {
        assert_eq!(Breakpoints::DEFAULT.active(500.0), Breakpoint::Sm);
    }
}
