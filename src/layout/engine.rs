//! Shortest-column-first balancing.
//!
//! The engine measures every content item, assigns each to the column with the
//! smallest running height and reports the resulting column heights. It never
//! commits a partial pass: if any item is not yet measurable the whole pass is
//! deferred and the previous layout stays in place until the next size change.
//!
//! Greedy placement is not optimal bin-packing, but it runs in
//! O(items × columns) and keeps the spread between the tallest and the shortest
//! column within the height of the tallest single item.

use crate::model::{ColumnCount, Item, ItemId, ItemMeasurement, LayoutResult};
use serde::Serialize;
use tracing::{debug, trace};

/// Container geometry read before a pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerGeometry {
    /// Client width of the container (px).
    pub width: f64,
    /// Content width of the first child (px).
    pub first_child_width: f64,
    /// Left + right margin of the first child (px).
    pub first_child_horizontal_margins: f64,
}

impl ContainerGeometry {
    /// Read geometry from the container width and its first child.
    pub fn measure(container_width: f64, items: &[Item]) -> Self {
        let (first_child_width, first_child_horizontal_margins) = items
            .first()
            .map(|item| {
                (
                    item.measurement.width,
                    item.measurement.margin.horizontal(),
                )
            })
            .unwrap_or((0.0, 0.0));
        Self {
            width: container_width,
            first_child_width,
            first_child_horizontal_margins,
        }
    }

    /// Effective (rendered, post-wrap) column count.
    ///
    /// Derived from geometry instead of configuration: the configured count is a
    /// request the container may not honor at every viewport width.
    pub fn column_count(&self) -> ColumnCount {
        let slot = self.first_child_width + self.first_child_horizontal_margins;
        ColumnCount::from_measured((self.width / slot).round())
    }
}

/// Column assigned to one item (1-based; used as its flex order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// The placed item.
    pub id: ItemId,
    /// 1-based column.
    pub order: usize,
}

/// A completed pass, ready to commit.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPass {
    /// Committed column count and height.
    pub result: LayoutResult,
    /// Placements in document order.
    pub placements: Vec<Placement>,
    /// Final running height of each column.
    pub column_heights: Vec<f64>,
}

/// Why a pass did not produce a layout.
///
/// None of these are failures: the rendering tree simply has not produced
/// usable geometry yet.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferReason {
    /// The container has no children.
    NoItems,
    /// The container has not been laid out.
    ZeroContainerWidth,
    /// The first child has no width, so no column count can be derived.
    ZeroFirstChildWidth,
    /// An item has not been laid out yet.
    UnmeasuredItem(ItemId),
    /// An item contains an image that has not loaded.
    UnloadedImage(ItemId),
}

impl std::fmt::Display for DeferReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeferReason::NoItems => f.write_str("no items to lay out"),
            DeferReason::ZeroContainerWidth => f.write_str("container has zero width"),
            DeferReason::ZeroFirstChildWidth => f.write_str("first child has zero width"),
            DeferReason::UnmeasuredItem(id) => write!(f, "item {id} has zero height"),
            DeferReason::UnloadedImage(id) => write!(f, "item {id} has an unloaded image"),
        }
    }
}

/// Outcome of [`LayoutEngine::recompute`].
#[derive(Debug, Clone, PartialEq)]
pub enum Recompute {
    /// Every item was measurable.
    Committed(LayoutPass),
    /// The pass stopped early; nothing should be committed.
    Deferred(DeferReason),
}

/// Stateless balancing algorithm. Committing a pass is up to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine;

impl LayoutEngine {
    /// Create the engine.
    pub fn new() -> Self {
        Self
    }

    /// Run one balancing pass over `items` in document order.
    pub fn recompute(&self, items: &[Item], geometry: ContainerGeometry) -> Recompute {
        if items.is_empty() {
            return defer(DeferReason::NoItems);
        }
        if !(geometry.width > 0.0) {
            return defer(DeferReason::ZeroContainerWidth);
        }
        if !(geometry.first_child_width > 0.0) {
            return defer(DeferReason::ZeroFirstChildWidth);
        }

        let column_count = geometry.column_count();
        let mut column_heights = vec![0.0_f64; column_count.as_usize()];
        let mut placements = Vec::with_capacity(items.len());

        for item in items.iter().filter(|item| !item.is_separator()) {
            let Some(height) = outer_height(&item.measurement) else {
                return defer(DeferReason::UnmeasuredItem(item.id.clone()));
            };
            if item.measurement.images.iter().any(|image| !image.is_loaded()) {
                return defer(DeferReason::UnloadedImage(item.id.clone()));
            }

            let column = shortest_column(&column_heights);
            column_heights[column] += height;
            trace!(item = %item.id, column = column + 1, height, "placed item");
            placements.push(Placement {
                id: item.id.clone(),
                order: column + 1,
            });
        }

        let max_column_height = column_heights.iter().copied().fold(0.0, f64::max);
        let result = LayoutResult::committed(column_count, max_column_height);
        debug!(
            columns = column_count.get(),
            max_column_height,
            items = placements.len(),
            "layout pass complete"
        );

        Recompute::Committed(LayoutPass {
            result,
            placements,
            column_heights,
        })
    }
}

fn defer(reason: DeferReason) -> Recompute {
    debug!(%reason, "layout pass deferred");
    Recompute::Deferred(reason)
}

/// Full height including vertical margins, or `None` while the item has no height yet.
///
/// The content height is rounded up to whole px before adding margins.
pub fn outer_height(measurement: &ItemMeasurement) -> Option<f64> {
    let height = measurement.height;
    if !(height.is_finite() && height > 0.0) {
        return None;
    }
    Some(height.ceil() + measurement.margin.vertical())
}

/// Index of the first column holding the minimum height.
///
/// Ties go to the lowest index.
pub fn shortest_column(column_heights: &[f64]) -> usize {
    let mut best = 0;
    for (index, height) in column_heights.iter().enumerate().skip(1) {
        if *height < column_heights[best] {
            best = index;
        }
    }
    best
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
