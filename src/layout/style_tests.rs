//! Tests for style resolution.

use super::*;
use crate::layout::spacing::ThemeSpacing;
use crate::model::{LayoutResult, MasonryProps, ResponsiveValue};

fn resolve(props: &MasonryProps, layout: &LayoutResult) -> StyleDescriptor {
    let breakpoints = Breakpoints::DEFAULT;
    let spacing = ThemeSpacing::default();
    StyleResolver::new(&breakpoints, &spacing).resolve(&OwnerState::new(props, layout))
}

fn width(percent: f64, minus_px: f64) -> Option<ItemWidth> {
    Some(ItemWidth { percent, minus_px })
}

fn ssr_props() -> MasonryProps {
    MasonryProps {
        default_columns: Some(ColumnCount::new(4)),
        default_height: Some(450.0),
        default_spacing: Some(1.0),
        ..MasonryProps::default()
    }
}

fn responsive_spacing() -> ResponsiveValue<f64> {
    ResponsiveValue::Breakpoints(BTreeMap::from([
        (Breakpoint::Base, 1.0),
        (Breakpoint::Sm, 2.0),
        (Breakpoint::Md, 3.0),
    ]))
}

mod item_width_tests {
    use super::*;

    #[test]
    fn percent_is_fixed_to_two_decimals() {
        assert_eq!(ItemWidth::new(ColumnCount::new(3), 0.0).percent, 33.33);
        assert_eq!(ItemWidth::new(ColumnCount::new(4), 0.0).percent, 25.0);
        assert_eq!(ItemWidth::new(ColumnCount::new(6), 0.0).percent, 16.67);
    }

    #[test]
    fn displays_as_calc() {
        assert_eq!(
            ItemWidth::new(ColumnCount::new(4), 8.0).to_string(),
            "calc(25.00% - 8px)"
        );
        assert_eq!(
            ItemWidth::new(ColumnCount::new(3), 2.5).to_string(),
            "calc(33.33% - 2.5px)"
        );
    }

    #[test]
    fn resolves_against_container_width() {
        let w = ItemWidth::new(ColumnCount::new(4), 8.0);
        assert_eq!(w.resolve(400.0), 92.0);
        assert_eq!(w.resolve(0.0), 0.0);
    }
}

mod static_tests {
    use super::*;

    #[test]
    fn uses_defaults_only() {
        let style = resolve(&ssr_props(), &ssr_props().initial_layout());
        let base = style.effective(Breakpoint::Base);
        assert_eq!(base.container_height, Some(450.0));
        assert_eq!(base.container_margin, Some(-0.5));
        assert_eq!(base.item_margin, Some(0.5));
        assert_eq!(base.item_width, width(25.0, 1.0));
        assert_eq!(style.blocks.len(), 1);
    }

    #[test]
    fn positions_wrap_modulo_default_columns() {
        let style = resolve(&ssr_props(), &ssr_props().initial_layout());
        assert!(style.is_static());
        for position in 1..=10 {
            assert_eq!(
                style.order_for_position(position),
                Some((position - 1) % 4 + 1),
                "position {position}"
            );
        }
        assert_eq!(style.order_for_position(1), style.order_for_position(5));
        assert_eq!(style.order_for_position(5), style.order_for_position(9));
    }

    #[test]
    fn order_rules_match_nth_of_type_selectors() {
        let style = static_descriptor(ColumnCount::new(4), 450.0, 1.0);
        let selectors: Vec<String> = style.order_rules.iter().map(OrderRule::selector).collect();
        assert_eq!(
            selectors,
            vec![
                ":nth-of-type(4n+1)",
                ":nth-of-type(4n+2)",
                ":nth-of-type(4n+3)",
                ":nth-of-type(4n+0)",
            ]
        );
    }

    #[test]
    fn single_default_column_puts_everything_first() {
        let style = static_descriptor(ColumnCount::ONE, 100.0, 0.0);
        assert_eq!(style.order_for_position(1), Some(1));
        assert_eq!(style.order_for_position(7), Some(1));
    }

    #[test]
    fn measurement_ends_static_regime() {
        let measured = LayoutResult::committed(ColumnCount::new(4), 240.0);
        let style = resolve(&ssr_props(), &measured);
        assert!(!style.is_static());
        assert_eq!(style.order_for_position(1), None);
    }
}

mod measured_tests {
    use super::*;

    #[test]
    fn scalar_config_with_known_height() {
        let measured = LayoutResult::committed(ColumnCount::new(4), 240.0);
        let style = resolve(&MasonryProps::default(), &measured);

        assert_eq!(style.blocks.len(), 1);
        let base = style.effective(Breakpoint::Base);
        assert_eq!(base.container_margin, Some(-2.0));
        assert_eq!(base.item_margin, Some(2.0));
        assert_eq!(base.container_height, Some(244.0));
        assert_eq!(base.item_width, width(25.0, 4.0));
    }

    #[test]
    fn container_height_rounds_up() {
        let measured = LayoutResult::committed(ColumnCount::new(2), 100.3);
        let style = resolve(&MasonryProps::default(), &measured);
        assert_eq!(style.effective(Breakpoint::Base).container_height, Some(105.0));
    }

    #[test]
    fn height_omitted_before_measurement() {
        let style = resolve(&MasonryProps::default(), &LayoutResult::default());
        assert_eq!(style.effective(Breakpoint::Base).container_height, None);
        assert!(!style.is_static());
    }

    #[test]
    fn responsive_spacing_picks_breakpoint_value() {
        let props = MasonryProps {
            spacing: responsive_spacing(),
            ..MasonryProps::default()
        };
        let style = resolve(&props, &LayoutResult::default());

        let base = style.effective(Breakpoint::Base);
        assert_eq!(base.item_margin, Some(2.0));
        assert_eq!(base.item_width, width(25.0, 4.0));

        let sm = style.effective(Breakpoint::Sm);
        assert_eq!(sm.item_margin, Some(4.0));
        assert_eq!(sm.container_margin, Some(-4.0));
        assert_eq!(sm.item_width, width(25.0, 8.0));

        let lg = style.effective(Breakpoint::Lg);
        assert_eq!(lg.item_margin, Some(6.0));
        assert_eq!(lg.item_width, width(25.0, 12.0));
    }

    #[test]
    fn responsive_columns_with_scalar_spacing() {
        let props = MasonryProps {
            columns: ResponsiveValue::Breakpoints(BTreeMap::from([
                (Breakpoint::Base, ColumnCount::new(1)),
                (Breakpoint::Md, ColumnCount::new(3)),
            ])),
            spacing: ResponsiveValue::Scalar(2.0),
            ..MasonryProps::default()
        };
        let style = resolve(&props, &LayoutResult::default());

        assert_eq!(style.effective(Breakpoint::Base).item_width, width(100.0, 8.0));
        assert_eq!(style.effective(Breakpoint::Sm).item_width, width(100.0, 8.0));
        assert_eq!(style.effective(Breakpoint::Md).item_width, width(33.33, 8.0));
        assert_eq!(style.effective(Breakpoint::Md).item_margin, Some(4.0));
    }

    #[test]
    fn differing_breakpoint_sets_compose() {
        let props = MasonryProps {
            columns: ResponsiveValue::Breakpoints(BTreeMap::from([(
                Breakpoint::Md,
                ColumnCount::new(3),
            )])),
            spacing: ResponsiveValue::Breakpoints(BTreeMap::from([
                (Breakpoint::Base, 1.0),
                (Breakpoint::Sm, 2.0),
            ])),
            ..MasonryProps::default()
        };
        let style = resolve(&props, &LayoutResult::default());

        // Below `md` there is no column value, so the widest defined one applies.
        assert_eq!(style.effective(Breakpoint::Base).item_width, width(33.33, 4.0));
        assert_eq!(style.effective(Breakpoint::Sm).item_width, width(33.33, 8.0));
        assert_eq!(style.effective(Breakpoint::Md).item_width, width(33.33, 8.0));
    }

    #[test]
    fn resolve_is_pure() {
        let props = MasonryProps {
            spacing: responsive_spacing(),
            ..MasonryProps::default()
        };
        let measured = LayoutResult::committed(ColumnCount::new(4), 240.0);
        assert_eq!(resolve(&props, &measured), resolve(&props, &measured));
    }
}

mod css_tests {
    use super::*;

    #[test]
    fn px_trims_trailing_zeros() {
        assert_eq!(px(8.0), "8px");
        assert_eq!(px(-0.5), "-0.5px");
        assert_eq!(px(450.0), "450px");
        assert_eq!(px(0.0), "0px");
        assert_eq!(px(-0.0), "0px");
    }

    #[test]
    fn static_css_contains_order_rules() {
        let css = static_descriptor(ColumnCount::new(2), 300.0, 2.0)
            .to_css(".masonry", &Breakpoints::DEFAULT);
        assert!(css.contains(".masonry > *:nth-of-type(2n+1) {\n  order: 1;\n}"));
        assert!(css.contains(".masonry > *:nth-of-type(2n+0) {\n  order: 2;\n}"));
        assert!(css.contains("height: 300px;"));
        assert!(css.contains("width: calc(50.00% - 2px);"));
        assert!(!css.contains("@media"));
    }

    #[test]
    fn responsive_css_uses_min_width_media_queries() {
        let props = MasonryProps {
            spacing: responsive_spacing(),
            ..MasonryProps::default()
        };
        let css = resolve(&props, &LayoutResult::default()).to_css(".m", &Breakpoints::DEFAULT);
        assert!(css.contains("@media (min-width: 480px) {"));
        assert!(css.contains("@media (min-width: 768px) {"));
        assert!(css.contains("width: calc(25.00% - 12px);"));
    }
}

#[test]
fn css_ident_escapes_unsafe_identifiers() {
    assert_eq!(css_ident("item-1"), "item-1");
    assert_eq!(css_ident("1"), "\\31 ");
    assert_eq!(css_ident("-2a"), "-\\32 a");
    assert_eq!(css_ident("a b"), "a\\ b");
    assert_eq!(css_ident("x.y#z"), "x\\.y\\#z");
    assert_eq!(css_ident("-"), "\\-");
    assert_eq!(css_ident("ünï"), "ünï");
}
