//! Tests for the annotator: purity, determinism, styling, and the
//! top-edge label clamp.

mod common;

use std::collections::HashMap;

use autoinspect::Color;
use common::*;

#[test]
fn test_empty_finding_set_copies_image_unchanged() {
    let source = test_image(64, 48);
    let annotator = Annotator::default();

    let annotated = annotator.annotate(&source, &[]);

    assert_eq!(annotated.width(), source.width());
    assert_eq!(annotated.height(), source.height());
    assert_eq!(annotated.as_raw(), source.to_rgb8().as_raw());
}

#[test]
fn test_annotate_never_mutates_source() {
    let source = test_image(64, 64);
    let before = source.to_rgb8();
    let findings = vec![make_finding("dent", 0.42, (10, 30, 40, 60))];

    let _ = Annotator::default().annotate(&source, &findings);

    assert_eq!(source.to_rgb8().as_raw(), before.as_raw());
}

#[test]
fn test_known_class_uses_table_color() {
    let source = test_image(100, 100);
    let findings = vec![make_finding("tire_flat", 0.9, (20, 50, 80, 90))];

    let annotated = Annotator::default().annotate(&source, &findings);

    // Top-left corner of the box border carries the tire_flat red.
    assert_eq!(annotated.get_pixel(20, 50).0, [255, 0, 0]);
}

#[test]
fn test_unknown_class_gets_fallback_color() {
    let source = test_image(100, 100);
    let findings = vec![make_finding("mystery_defect", 0.5, (20, 50, 80, 90))];
    let annotator = Annotator::default();

    let annotated = annotator.annotate(&source, &findings);
    assert_eq!(annotated.get_pixel(20, 50).0, [0, 255, 0]);

    // Deterministic across runs.
    let again = annotator.annotate(&source, &findings);
    assert_eq!(annotated.as_raw(), again.as_raw());
}

#[test]
fn test_injected_palette_overrides_default() {
    let table = StyleTable::new(
        HashMap::from([("dent".to_string(), Color { r: 1, g: 2, b: 3 })]),
        Color { r: 9, g: 9, b: 9 },
    );
    let annotator = Annotator::new(table);
    let source = test_image(100, 100);

    let dent = vec![make_finding("dent", 0.5, (10, 40, 60, 80))];
    let annotated = annotator.annotate(&source, &dent);
    assert_eq!(annotated.get_pixel(10, 40).0, [1, 2, 3]);

    let other = vec![make_finding("scratch", 0.5, (10, 40, 60, 80))];
    let annotated = annotator.annotate(&source, &other);
    assert_eq!(annotated.get_pixel(10, 40).0, [9, 9, 9]);
}

#[test]
fn test_label_is_clamped_inside_top_edge() {
    let source = test_image(200, 120);
    // Box starts at row 2: the label background cannot fit above it and
    // must be clamped to row 0 instead of vanishing off-canvas.
    let findings = vec![make_finding("dent", 0.42, (10, 2, 150, 100))];

    let annotated = Annotator::default().annotate(&source, &findings);

    // Row 0 above the box start holds label background (dent pink) or
    // label text (white), never untouched gray.
    let px = annotated.get_pixel(12, 0).0;
    assert!(
        px == [255, 192, 203] || px == [255, 255, 255],
        "expected label pixels at the top edge, got {px:?}"
    );
}

#[test]
fn test_oversized_box_does_not_panic() {
    let source = test_image(50, 50);
    // Extends past both image edges; drawing clips instead of failing.
    let findings = vec![make_finding("scratch", 0.7, (40, 40, 500, 500))];

    let annotated = Annotator::default().annotate(&source, &findings);
    assert_eq!((annotated.width(), annotated.height()), (50, 50));
}
