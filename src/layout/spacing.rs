//! Theme spacing units to pixels.

use crate::model::{BreakpointResolver, Resolved, ResponsiveValue};

/// Converts an abstract spacing unit into px.
pub trait UnitConverter {
    /// Pixel length of `units` spacing units.
    fn to_pixels(&self, units: f64) -> f64;
}

impl<F> UnitConverter for F
where
    F: Fn(f64) -> f64,
{
    fn to_pixels(&self, units: f64) -> f64 {
        self(units)
    }
}

/// Linear spacing scale: `units * px_per_unit`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeSpacing {
    px_per_unit: f64,
}

impl ThemeSpacing {
    /// 0.25rem at a 16px root font size.
    pub const DEFAULT_UNIT_PX: f64 = 4.0;

    /// Create a scale. Non-finite or negative unit sizes fall back to the default.
    pub fn new(px_per_unit: f64) -> Self {
        let px_per_unit = if px_per_unit.is_finite() && px_per_unit >= 0.0 {
            px_per_unit
        } else {
            Self::DEFAULT_UNIT_PX
        };
        Self { px_per_unit }
    }

    /// Pixels per unit.
    pub fn px_per_unit(&self) -> f64 {
        self.px_per_unit
    }
}

impl Default for ThemeSpacing {
    fn default() -> Self {
        Self::new(Self::DEFAULT_UNIT_PX)
    }
}

impl UnitConverter for ThemeSpacing {
    fn to_pixels(&self, units: f64) -> f64 {
        units * self.px_per_unit
    }
}

/// Resolve a (possibly responsive) spacing value to px per breakpoint.
pub fn resolve_spacing<R, C>(
    spacing: &ResponsiveValue<f64>,
    resolver: &R,
    converter: &C,
) -> Resolved<f64>
where
    R: BreakpointResolver + ?Sized,
    C: UnitConverter + ?Sized,
{
    resolver.resolve(spacing).map(|units| converter.to_pixels(*units))
}
