//! Property-based tests for layout invariants.
//!
//! Tests validate:
//! 1. Greedy balancing keeps the column spread within the tallest item
//! 2. Committed results always carry `columns - 1` line breaks
//! 3. Any unmeasurable item defers the whole pass
//! 4. The static layout assigns columns by position modulo the column count
//! 5. Style resolution is pure and responsive values carry forward

use masonry_layout::layout::{
    static_descriptor, ContainerGeometry, DeferReason, FlushOutcome, LayoutEngine, Masonry,
    ObservedSet, Recompute, StyleResolver, ThemeSpacing, VisualTree,
};
use masonry_layout::model::{
    Breakpoint, Breakpoints, ColumnCount, Edges, Item, ItemId, ItemMeasurement, LayoutResult,
    MasonryProps, OwnerState, ResponsiveValue,
};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::convert::Infallible;

// ===== Helpers =====

fn measured(index: usize, height: f64) -> Item {
    Item::content(
        ItemId::from_position(index),
        ItemMeasurement {
            height,
            width: 100.0,
            margin: Edges::default(),
            images: Vec::new(),
        },
    )
}

fn items(heights: &[f64]) -> Vec<Item> {
    heights
        .iter()
        .enumerate()
        .map(|(i, h)| measured(i, *h))
        .collect()
}

/// Container exactly `columns` slots of 100px wide.
fn geometry(columns: u16) -> ContainerGeometry {
    ContainerGeometry {
        width: f64::from(columns) * 100.0,
        first_child_width: 100.0,
        first_child_horizontal_margins: 0.0,
    }
}

struct SlotTree {
    items: Vec<Item>,
    width: f64,
}

impl VisualTree for SlotTree {
    fn container_width(&self) -> f64 {
        self.width
    }

    fn items(&self) -> Vec<Item> {
        self.items.clone()
    }
}

fn flush(masonry: &mut Masonry<ObservedSet>, tree: &SlotTree) -> FlushOutcome {
    match masonry.flush_sync(tree, |_| Ok::<(), Infallible>(())) {
        Ok(outcome) => outcome,
        Err(never) => match never {},
    }
}

fn heights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.5f64..500.0, 1..40)
}

fn spacing_map() -> impl Strategy<Value = BTreeMap<Breakpoint, f64>> {
    prop::collection::btree_map(prop::sample::select(Breakpoint::ALL.to_vec()), 0.0f64..10.0, 1..4)
}

// ===== Property 1 & 2: Balancing =====

proptest! {
    #[test]
    fn column_spread_is_bounded_by_tallest_item(heights in heights(), columns in 1u16..8) {
        let Recompute::Committed(pass) = LayoutEngine::new().recompute(&items(&heights), geometry(columns)) else {
            return Err(TestCaseError::fail("measured items must commit"));
        };

        let tallest_item = heights.iter().map(|h| h.ceil()).fold(0.0, f64::max);
        let max = pass.column_heights.iter().copied().fold(f64::MIN, f64::max);
        let min = pass.column_heights.iter().copied().fold(f64::MAX, f64::min);

        prop_assert!(max - min <= tallest_item, "spread {} > tallest {}", max - min, tallest_item);
        prop_assert_eq!(pass.result.max_column_height(), Some(max));
    }

    #[test]
    fn committed_layout_has_one_fewer_break_than_columns(heights in heights(), columns in 1u16..8) {
        let Recompute::Committed(pass) = LayoutEngine::new().recompute(&items(&heights), geometry(columns)) else {
            return Err(TestCaseError::fail("measured items must commit"));
        };

        prop_assert_eq!(pass.result.column_count(), ColumnCount::new(columns));
        prop_assert_eq!(pass.result.line_break_count(), usize::from(columns) - 1);
        prop_assert_eq!(pass.placements.len(), heights.len());
        for placement in &pass.placements {
            prop_assert!((1..=usize::from(columns)).contains(&placement.order));
        }
    }

    #[test]
    fn column_heights_account_for_every_item(heights in heights(), columns in 1u16..8) {
        let Recompute::Committed(pass) = LayoutEngine::new().recompute(&items(&heights), geometry(columns)) else {
            return Err(TestCaseError::fail("measured items must commit"));
        };

        let placed: f64 = pass.column_heights.iter().sum();
        let expected: f64 = heights.iter().map(|h| h.ceil()).sum();
        prop_assert!((placed - expected).abs() < 1e-6);
    }
}

// ===== Property 3: No Partial Commit =====

proptest! {
    #[test]
    fn zero_height_item_defers_whole_pass(
        heights in heights(),
        columns in 1u16..8,
        broken in any::<prop::sample::Index>(),
    ) {
        let mut masonry: Masonry<ObservedSet> = Masonry::new(
            MasonryProps::default(),
            Breakpoints::DEFAULT,
            ThemeSpacing::default(),
            Some(ObservedSet::new()),
        );
        let mut tree = SlotTree { items: items(&heights), width: f64::from(columns) * 100.0 };
        flush(&mut masonry, &tree);
        let committed = *masonry.layout();
        let placements = masonry.frame().placements;

        let index = broken.index(tree.items.len());
        tree.items[index].measurement.height = 0.0;
        let outcome = flush(&mut masonry, &tree);

        prop_assert_eq!(
            outcome,
            FlushOutcome::Deferred(DeferReason::UnmeasuredItem(ItemId::from_position(index)))
        );
        prop_assert_eq!(*masonry.layout(), committed);
        prop_assert_eq!(masonry.frame().placements, placements);
    }

    #[test]
    fn zero_width_container_is_a_no_op(heights in heights()) {
        let geometry = ContainerGeometry { width: 0.0, ..geometry(4) };
        prop_assert_eq!(
            LayoutEngine::new().recompute(&items(&heights), geometry),
            Recompute::Deferred(DeferReason::ZeroContainerWidth)
        );
    }
}

// ===== Property 4: Static Layout =====

proptest! {
    #[test]
    fn static_order_is_position_modulo_columns(columns in 1u16..12, position in 1usize..500) {
        let descriptor = static_descriptor(ColumnCount::new(columns), 400.0, 2.0);
        let expected = (position - 1) % usize::from(columns) + 1;
        prop_assert_eq!(descriptor.order_for_position(position), Some(expected));
    }
}

// ===== Property 5: Style Resolution =====

proptest! {
    #[test]
    fn resolve_is_pure(spacing in spacing_map(), columns in 1u16..6, max in proptest::option::of(1.0f64..2000.0)) {
        let props = MasonryProps {
            columns: ResponsiveValue::Scalar(ColumnCount::new(columns)),
            spacing: ResponsiveValue::Breakpoints(spacing),
            ..MasonryProps::default()
        };
        let mut owner = OwnerState::new(&props, &LayoutResult::default());
        owner.max_column_height = max;

        let breakpoints = Breakpoints::DEFAULT;
        let converter = ThemeSpacing::default();
        let resolver = StyleResolver::new(&breakpoints, &converter);
        prop_assert_eq!(resolver.resolve(&owner), resolver.resolve(&owner));
    }

    #[test]
    fn spacing_carries_forward_from_first_defined_breakpoint(spacing in spacing_map()) {
        let props = MasonryProps {
            spacing: ResponsiveValue::Breakpoints(spacing.clone()),
            ..MasonryProps::default()
        };
        let owner = OwnerState::new(&props, &LayoutResult::initial(None));
        let breakpoints = Breakpoints::DEFAULT;
        let converter = ThemeSpacing::default();
        let descriptor = StyleResolver::new(&breakpoints, &converter).resolve(&owner);

        for bp in Breakpoint::ALL {
            let effective = descriptor.effective(bp);
            prop_assert!(effective.item_width.is_some(), "width missing at {}", bp);
            match spacing.range(..=bp).next_back() {
                Some((_, units)) => prop_assert_eq!(effective.item_margin, Some(units * 4.0 / 2.0)),
                None => prop_assert_eq!(effective.item_margin, None),
            }
        }
    }
}
