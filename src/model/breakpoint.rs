//! Named viewport-width breakpoints.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Responsive breakpoint tiers, ordered from narrowest to widest.
///
/// | Breakpoint | Default min width |
/// |------------|-------------------|
/// | `base`     | 0 px              |
/// | `sm`       | 480 px            |
/// | `md`       | 768 px            |
/// | `lg`       | 992 px            |
/// | `xl`       | 1280 px           |
/// | `2xl`      | 1536 px           |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Breakpoint {
    /// Narrowest tier; always active.
    #[serde(rename = "base")]
    Base,
    /// Small viewports.
    #[serde(rename = "sm")]
    Sm,
    /// Medium viewports.
    #[serde(rename = "md")]
    Md,
    /// Large viewports.
    #[serde(rename = "lg")]
    Lg,
    /// Extra large viewports.
    #[serde(rename = "xl")]
    Xl,
    /// Ultra wide viewports.
    #[serde(rename = "2xl")]
    Xxl,
}

impl Breakpoint {
    /// All breakpoints in ascending order.
    pub const ALL: [Breakpoint; 6] = [
        Breakpoint::Base,
        Breakpoint::Sm,
        Breakpoint::Md,
        Breakpoint::Lg,
        Breakpoint::Xl,
        Breakpoint::Xxl,
    ];

    /// Short label used in configuration and CSS output.
    pub const fn label(self) -> &'static str {
        match self {
            Breakpoint::Base => "base",
            Breakpoint::Sm => "sm",
            Breakpoint::Md => "md",
            Breakpoint::Lg => "lg",
            Breakpoint::Xl => "xl",
            Breakpoint::Xxl => "2xl",
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string does not name a breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown breakpoint: {0:?}")]
pub struct UnknownBreakpoint(pub String);

impl FromStr for Breakpoint {
    type Err = UnknownBreakpoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Breakpoint::ALL
            .into_iter()
            .find(|bp| bp.label() == s)
            .ok_or_else(|| UnknownBreakpoint(s.to_string()))
    }
}

/// Minimum widths (in px) at which each breakpoint becomes active.
///
/// `base` implicitly starts at 0. Thresholds are kept monotonically
/// non-decreasing by [`Breakpoints::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Breakpoints {
    /// Minimum width for `sm`.
    pub sm: u32,
    /// Minimum width for `md`.
    pub md: u32,
    /// Minimum width for `lg`.
    pub lg: u32,
    /// Minimum width for `xl`.
    pub xl: u32,
    /// Minimum width for `2xl`.
    #[serde(rename = "2xl")]
    pub xxl: u32,
}

impl Breakpoints {
    /// 30em / 48em / 62em / 80em / 96em at a 16px root font size.
    pub const DEFAULT: Self = Self {
        sm: 480,
        md: 768,
        lg: 992,
        xl: 1280,
        xxl: 1536,
    };

    /// Create thresholds, sanitized to be monotonically non-decreasing.
    pub fn new(sm: u32, md: u32, lg: u32, xl: u32, xxl: u32) -> Self {
        let md = md.max(sm);
        let lg = lg.max(md);
        let xl = xl.max(lg);
        let xxl = xxl.max(xl);
        Self {
            sm,
            md,
            lg,
            xl,
            xxl,
        }
    }

    /// Minimum width (px) for a breakpoint.
    pub const fn min_width(self, bp: Breakpoint) -> u32 {
        match bp {
            Breakpoint::Base => 0,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
            Breakpoint::Xxl => self.xxl,
        }
    }

    /// Classify a viewport width into the widest breakpoint whose threshold it reaches.
    pub fn classify_width(self, width_px: f64) -> Breakpoint {
        Breakpoint::ALL
            .into_iter()
            .rev()
            .find(|bp| width_px >= f64::from(self.min_width(*bp)))
            .unwrap_or(Breakpoint::Base)
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}
