//! Media query evaluation through the public container API.

use mediasheet::{PropertyValue, StyleSheetContainer, ViewportSize};
use proptest::prelude::*;

/// A container with one `p` rule guarded by `query`.
fn guarded(query: &str) -> StyleSheetContainer {
    StyleSheetContainer::parse(&format!("@media {query} {{ p {{ color: red }} }}"), 1).unwrap()
}

fn applies(container: &mut StyleSheetContainer, width: f32, height: f32, dp_ratio: f32) -> bool {
    container
        .compiled_style_sheet(ViewportSize::new(width, height), dp_ratio)
        .get("p")
        .is_some()
}

#[test]
fn test_width_conjunction() {
    let mut container = guarded("(min-width: 100px) and (max-width: 200px)");
    assert!(applies(&mut container, 150.0, 100.0, 1.0));
    assert!(!applies(&mut container, 50.0, 100.0, 1.0));
    assert!(!applies(&mut container, 250.0, 100.0, 1.0));
}

#[test]
fn test_orientation() {
    let mut portrait = guarded("(orientation: portrait)");
    let mut landscape = guarded("(orientation: landscape)");

    assert!(applies(&mut portrait, 100.0, 200.0, 1.0));
    assert!(!applies(&mut landscape, 100.0, 200.0, 1.0));
    assert!(applies(&mut landscape, 200.0, 100.0, 1.0));
    assert!(!applies(&mut portrait, 200.0, 100.0, 1.0));
    assert!(applies(&mut portrait, 100.0, 100.0, 1.0));
    assert!(!applies(&mut landscape, 100.0, 100.0, 1.0));
}

#[test]
fn test_exact_features() {
    let mut width = guarded("(width: 320px)");
    assert!(applies(&mut width, 320.0, 480.0, 1.0));
    assert!(!applies(&mut width, 320.5, 480.0, 1.0));

    let mut ratio = guarded("(aspect-ratio: 16/9)");
    assert!(applies(&mut ratio, 1600.0, 900.0, 1.0));
    assert!(!applies(&mut ratio, 1600.0, 901.0, 1.0));

    let mut resolution = guarded("(resolution: 192dpi)");
    assert!(applies(&mut resolution, 10.0, 10.0, 2.0));
    assert!(!applies(&mut resolution, 10.0, 10.0, 2.5));
}

#[test]
fn test_relative_lengths() {
    // em resolves against a 12px font size
    let mut em = guarded("(min-width: 50em)");
    assert!(applies(&mut em, 600.0, 100.0, 1.0));
    assert!(!applies(&mut em, 599.0, 100.0, 1.0));

    let mut dp = guarded("(max-width: 300dp)");
    assert!(applies(&mut dp, 600.0, 100.0, 2.0));
    assert!(!applies(&mut dp, 600.0, 100.0, 1.0));
}

#[test]
fn test_height_features() {
    let mut container = guarded("(min-height: 300px) and (max-height: 500px)");
    assert!(applies(&mut container, 10.0, 400.0, 1.0));
    assert!(!applies(&mut container, 10.0, 200.0, 1.0));
    assert!(!applies(&mut container, 10.0, 600.0, 1.0));
}

#[test]
fn test_unknown_features_are_ignored() {
    let mut container = guarded("(hover: hover) and (min-width: 10px)");
    assert!(applies(&mut container, 20.0, 20.0, 1.0));
    assert!(!applies(&mut container, 5.0, 20.0, 1.0));
}

#[test]
fn test_later_block_overrides_earlier() {
    let css = "
        @media (min-width: 100px) { p { color: red } }
        @media (min-width: 200px) { p { color: blue } }
    ";
    let mut container = StyleSheetContainer::parse(css, 1).unwrap();

    let sheet = container.compiled_style_sheet(ViewportSize::new(300.0, 100.0), 1.0);
    assert_eq!(
        sheet.property("p", "color").unwrap().value,
        PropertyValue::Keyword("blue".into())
    );
    let sheet = container.compiled_style_sheet(ViewportSize::new(150.0, 100.0), 1.0);
    assert_eq!(
        sheet.property("p", "color").unwrap().value,
        PropertyValue::Keyword("red".into())
    );
}

#[test]
fn test_combine_appends_and_orders_new_conditions() {
    let base = guarded("(min-width: 100px)");
    let other = StyleSheetContainer::parse("@media (max-width: 50px) { a { color: blue } }", 1).unwrap();

    let mut combined = base.combine(&other);
    assert_eq!(combined.media_blocks().len(), 2);

    let sheet = combined.compiled_style_sheet(ViewportSize::new(40.0, 40.0), 1.0);
    assert!(sheet.get("p").is_none());
    assert!(sheet.get("a").is_some());
}

#[test]
fn test_combine_keeps_unknown_feature_values_apart() {
    let base = guarded("(hover: hover)");
    let other = StyleSheetContainer::parse("@media (hover: none) { a { color: blue } }", 1).unwrap();

    let combined = base.combine(&other);
    assert_eq!(combined.media_blocks().len(), 2);
    let merged = base.combine(&guarded("(hover: hover)"));
    assert_eq!(merged.media_blocks().len(), 1);
}

proptest! {
    #[test]
    fn global_rules_always_apply(
        width in 0.0f32..5000.0,
        height in 0.0f32..5000.0,
        dp_ratio in 0.5f32..4.0,
    ) {
        let mut container = StyleSheetContainer::parse("p { color: red }", 1).unwrap();
        prop_assert!(applies(&mut container, width, height, dp_ratio));
    }

    #[test]
    fn equal_contexts_compile_once(
        width in 1.0f32..5000.0,
        height in 1.0f32..5000.0,
        dp_ratio in 0.5f32..4.0,
    ) {
        let mut container = guarded("(min-width: 600px)");
        let viewport = ViewportSize::new(width, height);

        let first = container.compiled_style_sheet(viewport, dp_ratio) as *const _;
        let second = container.compiled_style_sheet(viewport, dp_ratio) as *const _;
        prop_assert_eq!(first, second);
        prop_assert_eq!(container.compile_count(), 1);
    }

    #[test]
    fn changed_context_reflects_only_the_new_one(
        first_width in 1.0f32..1200.0,
        second_width in 1.0f32..1200.0,
    ) {
        prop_assume!(first_width != second_width);
        let mut container = guarded("(min-width: 600px)");

        applies(&mut container, first_width, 100.0, 1.0);
        let result = applies(&mut container, second_width, 100.0, 1.0);
        prop_assert_eq!(result, second_width >= 600.0);
        prop_assert_eq!(container.compile_count(), 2);
    }
}
