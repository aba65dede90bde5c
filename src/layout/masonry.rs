//! Masonry coordinator: props + committed layout + observation, flushed to a painter.
//!
//! Owns the only mutable layout state. Every commit replaces the
//! [`LayoutResult`] wholesale and is painted before [`Masonry::flush_sync`]
//! returns, so no frame with pre-commit geometry can be shown in between.

use super::engine::{ContainerGeometry, DeferReason, LayoutEngine, Recompute};
use super::observer::{ObservationKey, SizeObservationController, SizeObserver};
use super::separators::{line_breaks, Separator};
use super::spacing::{ThemeSpacing, UnitConverter};
use super::style::{css_ident, StyleDescriptor, StyleResolver};
use crate::model::{
    BoxSize, BreakpointResolver, Breakpoints, Item, ItemId, LayoutResult, MasonryProps,
    OwnerState,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::{debug, info, trace};

/// Read access to the rendered container.
pub trait VisualTree {
    /// Client width of the container (px).
    fn container_width(&self) -> f64;

    /// Direct children in document order, with their current measurements.
    fn items(&self) -> Vec<Item>;
}

/// Everything the rendering tree needs to apply after a resolve cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasonryFrame {
    /// Committed (or initial) layout.
    pub layout: LayoutResult,
    /// Styles resolved from the layout.
    pub style: StyleDescriptor,
    /// Committed column (1-based order) per item.
    pub placements: BTreeMap<ItemId, usize>,
    /// Column terminators.
    pub separators: Vec<Separator>,
    /// Whether the static placeholder styles are in use.
    pub is_ssr: bool,
}

impl MasonryFrame {
    /// Order for an item: the committed placement, else the static rule for its
    /// 1-based document position.
    pub fn order_of(&self, id: &ItemId, position: usize) -> Option<usize> {
        self.placements
            .get(id)
            .copied()
            .or_else(|| self.style.order_for_position(position))
    }

    /// Descriptor CSS, then one `order` rule per committed placement and one
    /// full-basis, zero-size rule per separator.
    ///
    /// Items and separators are selected by element id.
    pub fn to_css(&self, selector: &str, breakpoints: &Breakpoints) -> String {
        let mut css = self.style.to_css(selector, breakpoints);
        for (id, order) in &self.placements {
            let _ = writeln!(css, "{selector} > #{} {{", css_ident(id.as_str()));
            let _ = writeln!(css, "  order: {order};");
            let _ = writeln!(css, "}}");
        }
        for separator in &self.separators {
            let _ = writeln!(css, "{selector} > #{} {{", css_ident(separator.id.as_str()));
            for line in ["flex-basis: 100%;", "width: 0;", "margin: 0;", "padding: 0;"] {
                let _ = writeln!(css, "  {line}");
            }
            let _ = writeln!(css, "  order: {};", separator.order);
            let _ = writeln!(css, "}}");
        }
        css
    }
}

/// What a flush did.
#[derive(Debug, Clone, PartialEq)]
pub enum FlushOutcome {
    /// A new layout was committed and painted.
    Committed,
    /// The pass was incomplete; the previous layout stays.
    Deferred(DeferReason),
    /// The notification did not concern a subscribed size change.
    Ignored,
}

/// Stateful masonry component.
pub struct Masonry<O, R = Breakpoints, C = ThemeSpacing>
where
    O: SizeObserver,
{
    props: MasonryProps,
    resolver: R,
    converter: C,
    engine: LayoutEngine,
    layout: LayoutResult,
    placements: BTreeMap<ItemId, usize>,
    controller: SizeObservationController<O>,
}

impl<O, R, C> Masonry<O, R, C>
where
    O: SizeObserver,
    R: BreakpointResolver,
    C: UnitConverter,
{
    /// Mount with the given props. `observer: None` selects the static-only mode.
    pub fn new(props: MasonryProps, resolver: R, converter: C, observer: Option<O>) -> Self {
        let layout = props.initial_layout();
        Self {
            props,
            resolver,
            converter,
            engine: LayoutEngine::new(),
            layout,
            placements: BTreeMap::new(),
            controller: SizeObservationController::new(observer),
        }
    }

    /// Current props.
    pub fn props(&self) -> &MasonryProps {
        &self.props
    }

    /// Last committed layout.
    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    /// Breakpoint resolver in use.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Size observation state.
    pub fn controller(&self) -> &SizeObservationController<O> {
        &self.controller
    }

    /// Replace props. Before the first measurement the initial layout follows
    /// the new defaults; afterwards the committed layout is kept until the next pass.
    pub fn set_props(&mut self, props: MasonryProps) {
        if !self.layout.is_measured() {
            self.layout = props.initial_layout();
        }
        self.props = props;
    }

    /// Fresh snapshot of props + committed layout.
    pub fn owner_state(&self) -> OwnerState {
        OwnerState::new(&self.props, &self.layout)
    }

    /// Styles for the current owner state.
    pub fn style(&self) -> StyleDescriptor {
        StyleResolver::new(&self.resolver, &self.converter).resolve(&self.owner_state())
    }

    /// Snapshot for painting.
    pub fn frame(&self) -> MasonryFrame {
        let owner = self.owner_state();
        MasonryFrame {
            layout: self.layout,
            style: StyleResolver::new(&self.resolver, &self.converter).resolve(&owner),
            placements: self.placements.clone(),
            separators: line_breaks(self.layout.line_break_count()),
            is_ssr: owner.is_ssr,
        }
    }

    /// Re-establish size observation for the current children.
    ///
    /// Returns `true` when subscriptions changed. The next report for every
    /// item then counts as a change, so a new item sequence is always laid out
    /// again even when no item changed size.
    pub fn sync_items(&mut self, items: &[Item]) -> bool {
        self.controller.sync(ObservationKey::new(&self.props, items))
    }

    /// Handle one size-change notification from the observation mechanism.
    pub fn on_size_change<T, E>(
        &mut self,
        id: &ItemId,
        size: BoxSize,
        tree: &T,
        paint: impl FnOnce(&MasonryFrame) -> Result<(), E>,
    ) -> Result<FlushOutcome, E>
    where
        T: VisualTree + ?Sized,
    {
        self.on_size_changes([(id.clone(), size)], tree, paint)
    }

    /// Handle one batch of notifications with at most one flush.
    pub fn on_size_changes<T, E>(
        &mut self,
        changes: impl IntoIterator<Item = (ItemId, BoxSize)>,
        tree: &T,
        paint: impl FnOnce(&MasonryFrame) -> Result<(), E>,
    ) -> Result<FlushOutcome, E>
    where
        T: VisualTree + ?Sized,
    {
        let mut changed = 0usize;
        for (id, size) in changes {
            if self.controller.notify(&id, size) {
                changed += 1;
            }
        }
        if changed == 0 {
            return Ok(FlushOutcome::Ignored);
        }
        trace!(changed, "size changes observed");
        self.flush_sync(tree, paint)
    }

    /// Measure, commit and paint in one step.
    ///
    /// `paint` runs only after a commit and before this returns. A deferred pass
    /// paints nothing and leaves the previous layout in place.
    pub fn flush_sync<T, E>(
        &mut self,
        tree: &T,
        paint: impl FnOnce(&MasonryFrame) -> Result<(), E>,
    ) -> Result<FlushOutcome, E>
    where
        T: VisualTree + ?Sized,
    {
        let items = tree.items();
        let geometry = ContainerGeometry::measure(tree.container_width(), &items);
        match self.engine.recompute(&items, geometry) {
            Recompute::Committed(pass) => {
                let changed = self.layout != pass.result;
                self.layout = pass.result;
                self.placements = pass
                    .placements
                    .into_iter()
                    .map(|placement| (placement.id, placement.order))
                    .collect();
                if changed {
                    info!(
                        columns = self.layout.column_count().get(),
                        max_column_height = self.layout.max_column_height(),
                        "layout committed"
                    );
                }
                paint(&self.frame())?;
                Ok(FlushOutcome::Committed)
            }
            Recompute::Deferred(reason) => {
                debug!(%reason, "keeping previous layout");
                Ok(FlushOutcome::Deferred(reason))
            }
        }
    }

    /// Unmount: release all subscriptions.
    pub fn teardown(&mut self) {
        self.controller.teardown();
    }
}

#[cfg(test)]
#[path = "masonry_tests.rs"]
mod tests;
