//! Container tests against the fixture style sheets.
//!
//! `base.css` is a reader layout with width, orientation, resolution and
//! print blocks; `overrides.css` is a user sheet layered on top of it.

use std::fs;
use std::io::Write;

use mediasheet::style::{Color, Length};
use mediasheet::{
    Error, ParseErrorKind, PropertyValue, StyleSheet, StyleSheetContainer, ViewportSize,
};
use tempfile::NamedTempFile;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture(name: &str) -> StyleSheetContainer {
    let path = format!("{}/{}", FIXTURES_DIR, name);
    let source = fs::read_to_string(&path).expect("fixture should exist");
    StyleSheetContainer::parse(&source, 1).expect("fixture should parse")
}

fn value<'a>(sheet: &'a StyleSheet, selector: &str, name: &str) -> &'a PropertyValue {
    &sheet
        .property(selector, name)
        .unwrap_or_else(|| panic!("{selector} {{ {name} }} not set"))
        .value
}

fn px(v: f32) -> PropertyValue {
    PropertyValue::Length(Length::Px(v))
}

fn keyword(k: &str) -> PropertyValue {
    PropertyValue::Keyword(k.to_string())
}

#[test]
fn test_load_fixture() {
    let source = fs::read_to_string(format!("{}/base.css", FIXTURES_DIR)).unwrap();
    let mut container = StyleSheetContainer::new();
    let count = container.load_style_sheet_container(&source, 1).unwrap();

    // body, h1/h2, .sidebar, two in the narrow block, one landscape,
    // one hi-dpi, one print and a:hover
    assert_eq!(count, 9);
    // global, narrow, landscape, hi-dpi and a trailing global block; print
    // is dropped
    assert_eq!(container.media_blocks().len(), 5);
    let empty: Vec<bool> = container
        .media_blocks()
        .iter()
        .map(|block| block.conditions.is_empty())
        .collect();
    assert_eq!(empty, vec![true, false, false, false, true]);
}

#[test]
fn test_desktop_viewport() {
    let mut container = fixture("base.css");
    let sheet = container.compiled_style_sheet(ViewportSize::new(1280.0, 800.0), 1.0);

    assert_eq!(value(sheet, ".sidebar", "width"), &px(320.0));
    assert_eq!(value(sheet, ".sidebar", "display"), &keyword("block"));
    assert_eq!(value(sheet, "body", "margin"), &px(8.0));
    assert_eq!(value(sheet, "body", "font-size"), &px(16.0));
    assert_eq!(
        value(sheet, "body", "color"),
        &PropertyValue::Color(Color::rgb(0x22, 0x22, 0x22))
    );
}

#[test]
fn test_narrow_viewport() {
    let mut container = fixture("base.css");
    let sheet = container.compiled_style_sheet(ViewportSize::new(480.0, 800.0), 1.0);

    assert_eq!(value(sheet, ".sidebar", "display"), &keyword("none"));
    assert_eq!(value(sheet, ".sidebar", "width"), &px(240.0));
    assert_eq!(value(sheet, "body", "margin"), &px(4.0));
}

#[test]
fn test_high_density_display() {
    let mut container = fixture("base.css");
    let sheet = container.compiled_style_sheet(ViewportSize::new(1280.0, 800.0), 2.0);
    assert_eq!(value(sheet, "body", "font-size"), &px(15.0));

    let sheet = container.compiled_style_sheet(ViewportSize::new(1280.0, 800.0), 1.5);
    assert_eq!(value(sheet, "body", "font-size"), &px(16.0));
}

#[test]
fn test_compiled_sheet_is_indexed() {
    let mut container = fixture("base.css");
    let sheet = container.compiled_style_sheet(ViewportSize::new(1280.0, 800.0), 1.0);
    assert!(sheet.is_indexed());

    let selectors: Vec<&str> = sheet
        .candidate_rules("div", None, &["sidebar"])
        .into_iter()
        .map(|rule| rule.selector_text())
        .collect();
    assert_eq!(selectors, vec![".sidebar"]);
}

#[test]
fn test_combine_with_overrides() {
    let base = fixture("base.css");
    let overrides = fixture("overrides.css");
    let mut combined = base.combine(&overrides);

    // the narrow block is shared; max-height is new
    assert_eq!(combined.media_blocks().len(), base.media_blocks().len() + 1);
    let narrow = overrides.media_blocks().iter().nth(1).unwrap();
    let merged = combined.media_blocks().find(&narrow.conditions).unwrap();
    assert_eq!(merged.style_sheet.len(), 2);
    assert!(base.media_blocks().find(&narrow.conditions).is_some());

    let sheet = combined.compiled_style_sheet(ViewportSize::new(480.0, 300.0), 1.0);
    // a unitless zero is stored as a number and read back as a length
    assert_eq!(value(sheet, "body", "margin"), &PropertyValue::Number(0.0));
    assert_eq!(value(sheet, "body", "margin").as_length(), Some(Length::Px(0.0)));
    assert_eq!(
        value(sheet, "body", "color"),
        &PropertyValue::Color(Color::rgb(0xee, 0xee, 0xee))
    );
    assert_eq!(value(sheet, "h1", "display"), &keyword("none"));

    // an !important declaration survives a later normal one
    let hover = sheet.property("a:hover", "color").unwrap();
    assert!(hover.important);
    assert_eq!(hover.value, PropertyValue::Color(Color::rgb(0x00, 0x66, 0xcc)));
}

#[test]
fn test_combine_leaves_inputs_untouched() {
    let mut base = fixture("base.css");
    let mut overrides = fixture("overrides.css");
    let viewport = ViewportSize::new(480.0, 300.0);

    let mut combined = base.combine(&overrides);
    combined.compiled_style_sheet(viewport, 1.0);

    let sheet = base.compiled_style_sheet(viewport, 1.0);
    assert_eq!(value(sheet, "body", "margin"), &px(4.0));
    assert!(sheet.get("h1").is_some_and(|p| p.get("display").is_none()));

    let sheet = overrides.compiled_style_sheet(viewport, 1.0);
    assert!(sheet.get(".sidebar").is_none());
    assert_eq!(sheet.len(), 3);
}

#[test]
fn test_repeated_compiles_reuse_the_sheet() {
    let mut container = fixture("base.css");
    let viewport = ViewportSize::new(1024.0, 768.0);

    let first = container.compiled_style_sheet(viewport, 1.0) as *const StyleSheet;
    let second = container.compiled_style_sheet(viewport, 1.0) as *const StyleSheet;
    assert_eq!(first, second);
    assert_eq!(container.compile_count(), 1);

    container.compiled_style_sheet(ViewportSize::new(1024.0, 600.0), 1.0);
    container.compiled_style_sheet(viewport, 1.0);
    assert_eq!(container.compile_count(), 3);
}

#[test]
fn test_failed_load_keeps_previous_rules() {
    let mut container = fixture("base.css");
    let viewport = ViewportSize::new(1280.0, 800.0);
    let before = container.compiled_style_sheet(viewport, 1.0).len();

    let result = container.load_style_sheet_container(
        "p { color: red }\n@media (min-width: 10px) { @media (max-width: 20px) { p { color: blue } } }",
        1,
    );
    assert!(matches!(
        result,
        Err(Error::Parse {
            kind: ParseErrorKind::NestedMediaRule,
            ..
        })
    ));

    assert_eq!(container.media_blocks().len(), 5);
    let sheet = container.compiled_style_sheet(viewport, 1.0);
    assert_eq!(sheet.len(), before);
    assert!(sheet.get("p").is_none());
}

#[test]
fn test_error_lines_are_offset() {
    let mut container = StyleSheetContainer::new();
    let error = container
        .load_style_sheet_container("a { color: red }\n\n@media (min-width: 1px) or (max-width: 2px) {}", 100)
        .unwrap_err();

    match error {
        Error::Parse { line, kind, .. } => {
            assert_eq!(line, 102);
            assert!(matches!(kind, ParseErrorKind::InvalidMediaQuery(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(container.media_blocks().is_empty());
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "@media (max-width: 100px) {{ p {{ width: 10px }} }}").unwrap();
    writeln!(file, "p {{ width: 50px }}").unwrap();

    let source = fs::read_to_string(file.path()).unwrap();
    let mut container = StyleSheetContainer::new();
    assert_eq!(container.load_style_sheet_container(&source, 1).unwrap(), 2);

    // the global rule comes later and wins
    let sheet = container.compiled_style_sheet(ViewportSize::new(80.0, 80.0), 1.0);
    assert_eq!(value(sheet, "p", "width"), &px(50.0));
}

#[test]
fn test_to_css_output() {
    let mut container =
        StyleSheetContainer::parse("p { color: red } @media (max-width: 10px) { a { color: blue } }", 1)
            .unwrap();
    let sheet = container.compiled_style_sheet(ViewportSize::new(100.0, 100.0), 1.0);
    assert_eq!(mediasheet::ToCss::to_css_string(sheet), "p { color: red; }\n");
}

#[test]
fn test_non_ascii_hash_value_loads() {
    let mut container = StyleSheetContainer::parse("p { color: #aé; width: 2px }", 1).unwrap();
    let sheet = container.compiled_style_sheet(ViewportSize::new(100.0, 100.0), 1.0);
    assert_eq!(value(sheet, "p", "color"), &PropertyValue::Raw("#aé".to_string()));
    assert_eq!(value(sheet, "p", "width"), &px(2.0));
}
