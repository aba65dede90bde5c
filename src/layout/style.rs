//! Owner state to concrete container/item geometry.
//!
//! Two regimes:
//!
//! - **Static** (pre-measurement): only the `default_*` props are used. Items are
//!   spread over the default columns by document position through nth-of-type
//!   order rules, so the placeholder resembles the eventual balanced layout.
//! - **Measured**: responsive `columns`/`spacing` are resolved per breakpoint
//!   and the container height follows the tallest measured column.
//!
//! Resolution is a pure function of the owner state.

use super::spacing::{resolve_spacing, UnitConverter};
use crate::model::{Breakpoint, BreakpointResolver, Breakpoints, ColumnCount, OwnerState};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// `calc(<percent>% - <minus_px>px)` item width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemWidth {
    /// Share of the container width, fixed to two decimals.
    pub percent: f64,
    /// Pixels subtracted from the share (the item spacing).
    pub minus_px: f64,
}

impl ItemWidth {
    /// Width of one of `columns` equal columns less `minus_px`.
    pub fn new(columns: ColumnCount, minus_px: f64) -> Self {
        let percent = (100.0 / f64::from(columns.get()) * 100.0).round() / 100.0;
        Self { percent, minus_px }
    }

    /// Width in px inside a container of `container_width` px.
    pub fn resolve(&self, container_width: f64) -> f64 {
        (container_width * self.percent / 100.0 - self.minus_px).max(0.0)
    }
}

impl std::fmt::Display for ItemWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "calc({:.2}% - {})", self.percent, px(self.minus_px))
    }
}

/// Declarations applying from one breakpoint upward. `None` leaves the value
/// inherited from narrower breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BlockStyle {
    /// Container margin (negative half spacing).
    pub container_margin: Option<f64>,
    /// Container height.
    pub container_height: Option<f64>,
    /// Item margin on every side.
    pub item_margin: Option<f64>,
    /// Item width.
    pub item_width: Option<ItemWidth>,
}

impl BlockStyle {
    /// Overlay `other` on top of `self`.
    fn cascade(&mut self, other: &BlockStyle) {
        self.container_margin = other.container_margin.or(self.container_margin);
        self.container_height = other.container_height.or(self.container_height);
        self.item_margin = other.item_margin.or(self.item_margin);
        self.item_width = other.item_width.or(self.item_width);
    }
}

/// `nth-of-type(<every>n+<offset>) { order: <order> }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderRule {
    /// Cycle length (the column count).
    pub every: usize,
    /// Position within the cycle.
    pub offset: usize,
    /// Column assigned to matching items.
    pub order: usize,
}

impl OrderRule {
    /// Whether the rule selects the item at 1-based `position`.
    pub fn matches(&self, position: usize) -> bool {
        position >= 1 && self.every > 0 && position % self.every == self.offset
    }

    /// CSS pseudo-class selecting the rule's items.
    pub fn selector(&self) -> String {
        format!(":nth-of-type({}n+{})", self.every, self.offset)
    }
}

/// Resolved styles for the masonry container and its items.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StyleDescriptor {
    /// Per-breakpoint declarations; `base` applies unconditionally.
    pub blocks: BTreeMap<Breakpoint, BlockStyle>,
    /// Static column assignment; only present before measurement.
    pub order_rules: Vec<OrderRule>,
}

impl StyleDescriptor {
    /// Declarations in effect at `bp` after cascading narrower breakpoints.
    pub fn effective(&self, bp: Breakpoint) -> BlockStyle {
        let mut style = BlockStyle::default();
        for block in self.blocks.range(..=bp).map(|(_, block)| block) {
            style.cascade(block);
        }
        style
    }

    /// Static order for a 1-based document position, if order rules exist.
    pub fn order_for_position(&self, position: usize) -> Option<usize> {
        self.order_rules
            .iter()
            .find(|rule| rule.matches(position))
            .map(|rule| rule.order)
    }

    /// Whether this is the pre-measurement placeholder.
    pub fn is_static(&self) -> bool {
        !self.order_rules.is_empty()
    }

    /// Render as CSS for `selector`, wrapping non-base blocks in min-width media queries.
    pub fn to_css(&self, selector: &str, breakpoints: &Breakpoints) -> String {
        let mut css = String::new();
        let base = self.blocks.get(&Breakpoint::Base).copied().unwrap_or_default();

        let _ = writeln!(css, "{selector} {{");
        for line in [
            "width: 100%;",
            "display: flex;",
            "flex-flow: column wrap;",
            "align-content: space-between;",
            "box-sizing: border-box;",
        ] {
            let _ = writeln!(css, "  {line}");
        }
        write_container(&mut css, &base, "  ");
        let _ = writeln!(css, "}}");

        let _ = writeln!(css, "{selector} > * {{");
        let _ = writeln!(css, "  box-sizing: border-box;");
        write_items(&mut css, &base, "  ");
        let _ = writeln!(css, "}}");

        for rule in &self.order_rules {
            let _ = writeln!(css, "{selector} > *{} {{", rule.selector());
            let _ = writeln!(css, "  order: {};", rule.order);
            let _ = writeln!(css, "}}");
        }

        for (bp, block) in self.blocks.iter().filter(|(bp, _)| **bp != Breakpoint::Base) {
            let _ = writeln!(css, "@media (min-width: {}px) {{", breakpoints.min_width(*bp));
            if block.container_margin.is_some() || block.container_height.is_some() {
                let _ = writeln!(css, "  {selector} {{");
                write_container(&mut css, block, "    ");
                let _ = writeln!(css, "  }}");
            }
            if block.item_margin.is_some() || block.item_width.is_some() {
                let _ = writeln!(css, "  {selector} > * {{");
                write_items(&mut css, block, "    ");
                let _ = writeln!(css, "  }}");
            }
            let _ = writeln!(css, "}}");
        }
        css
    }
}

fn write_container(css: &mut String, block: &BlockStyle, indent: &str) {
    if let Some(margin) = block.container_margin {
        let _ = writeln!(css, "{indent}margin: {};", px(margin));
    }
    if let Some(height) = block.container_height {
        let _ = writeln!(css, "{indent}height: {};", px(height));
    }
}

fn write_items(css: &mut String, block: &BlockStyle, indent: &str) {
    if let Some(margin) = block.item_margin {
        let _ = writeln!(css, "{indent}margin: {};", px(margin));
    }
    if let Some(width) = block.item_width {
        let _ = writeln!(css, "{indent}width: {width};");
    }
}

/// Escape `raw` for use as a CSS identifier, following CSSOM's
/// serialize-an-identifier (`1` becomes `\31 `, `a b` becomes `a\ b`).
pub(crate) fn css_ident(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len());
    for (index, &c) in chars.iter().enumerate() {
        let leading_digit = c.is_ascii_digit()
            && (index == 0 || (index == 1 && chars[0] == '-'));
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => {
                let _ = write!(out, "\\{:x} ", u32::from(c));
            }
            _ if leading_digit => {
                let _ = write!(out, "\\{:x} ", u32::from(c));
            }
            '-' if chars.len() == 1 => out.push_str("\\-"),
            '-' | '_' => out.push(c),
            _ if c.is_ascii_alphanumeric() || !c.is_ascii() => out.push(c),
            _ => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Format a px length without trailing zeros (`8px`, `-0.5px`).
fn px(value: f64) -> String {
    if value == 0.0 {
        return "0px".to_string();
    }
    let formatted = format!("{value:.4}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}px")
}

/// Turns owner state into a [`StyleDescriptor`].
#[derive(Debug)]
pub struct StyleResolver<'a, R: ?Sized, C: ?Sized> {
    resolver: &'a R,
    converter: &'a C,
}

impl<'a, R, C> StyleResolver<'a, R, C>
where
    R: BreakpointResolver + ?Sized,
    C: UnitConverter + ?Sized,
{
    /// Resolver over the given breakpoints and unit scale.
    pub fn new(resolver: &'a R, converter: &'a C) -> Self {
        Self {
            resolver,
            converter,
        }
    }

    /// Styles for `state`: static when it is in the placeholder regime, measured otherwise.
    pub fn resolve(&self, state: &OwnerState) -> StyleDescriptor {
        match state.ssr_defaults() {
            Some(defaults) => static_descriptor(defaults.columns, defaults.height, defaults.spacing),
            None => self.measured_descriptor(state),
        }
    }

    fn measured_descriptor(&self, state: &OwnerState) -> StyleDescriptor {
        let spacing = resolve_spacing(&state.spacing, self.resolver, self.converter);
        let columns = self.resolver.resolve(&state.columns);
        let mut blocks: BTreeMap<Breakpoint, BlockStyle> = BTreeMap::new();

        for bp in spacing.breakpoints() {
            let Some(space) = spacing.value_at(bp).copied() else {
                continue;
            };
            let block = blocks.entry(bp).or_default();
            block.container_margin = Some(-(space / 2.0));
            block.item_margin = Some(space / 2.0);
            block.container_height = state
                .max_column_height
                .map(|height| (height + space).ceil());
        }

        // Widths depend on both columns and spacing, so they are emitted at every
        // breakpoint where either changes.
        let width_breakpoints: BTreeSet<Breakpoint> = spacing
            .breakpoints()
            .into_iter()
            .chain(columns.breakpoints())
            .collect();
        for bp in width_breakpoints {
            let Some(column) = columns.value_at(bp).or_else(|| columns.last()).copied() else {
                continue;
            };
            let space = spacing.value_at(bp).copied().unwrap_or(0.0);
            blocks.entry(bp).or_default().item_width = Some(ItemWidth::new(column, space));
        }

        StyleDescriptor {
            blocks,
            order_rules: Vec::new(),
        }
    }
}

/// Measurement-free placeholder layout.
///
/// Item at 1-based position `i` lands in column `((i - 1) mod columns) + 1`.
/// Spacing is used as-is, without unit conversion.
pub fn static_descriptor(columns: ColumnCount, height: f64, spacing: f64) -> StyleDescriptor {
    let every = columns.as_usize();
    let order_rules = (1..=every)
        .map(|order| OrderRule {
            every,
            offset: order % every,
            order,
        })
        .collect();

    let base = BlockStyle {
        container_margin: Some(-(spacing / 2.0)),
        container_height: Some(height),
        item_margin: Some(spacing / 2.0),
        item_width: Some(ItemWidth::new(columns, spacing)),
    };

    StyleDescriptor {
        blocks: BTreeMap::from([(Breakpoint::Base, base)]),
        order_rules,
    }
}

#[cfg(test)]
#[path = "style_tests.rs"]
mod tests;
