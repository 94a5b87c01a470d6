//! Tests for finding normalization and status classification.

mod common;

use autoinspect::InspectionError;
use autoinspect::classify;
use autoinspect::detection::normalize::normalize;
use common::*;

#[test]
fn test_classify_empty_set_passes() {
    assert_eq!(classify(&[]), VehicleStatus::Pass);
}

#[test]
fn test_classify_any_finding_fails() {
    // A single low-confidence finding is sufficient to fail a vehicle.
    let one = vec![make_finding("dent", 0.06, (0, 0, 10, 10))];
    assert_eq!(classify(&one), VehicleStatus::Fail);

    let many = vec![
        make_finding("scratch", 0.9, (0, 0, 10, 10)),
        make_finding("tire_flat", 0.4, (20, 20, 40, 40)),
    ];
    assert_eq!(classify(&many), VehicleStatus::Fail);
}

#[test]
fn test_normalize_preserves_order_and_values() -> anyhow::Result<()> {
    let raw = vec![
        make_raw("scratch", 0.87, [60, 20, 90, 40]),
        make_raw("dent", 0.4198, [10, 10, 50, 50]),
    ];
    let findings = normalize(&raw)?;

    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].class_name, "scratch");
    assert_eq!(findings[1].class_name, "dent");
    assert_eq!(findings[1].confidence, 0.4198);
    assert_eq!(findings[1].bbox, BoundingBox { x1: 10, y1: 10, x2: 50, y2: 50 });

    Ok(())
}

#[test]
fn test_normalize_accepts_unknown_classes() -> anyhow::Result<()> {
    // Classes missing from the style table must not abort an inspection.
    let raw = vec![make_raw("rust_spot", 0.3, [0, 0, 5, 5])];
    let findings = normalize(&raw)?;
    assert_eq!(findings[0].class_name, "rust_spot");
    Ok(())
}

#[test]
fn test_normalize_never_filters_by_confidence() -> anyhow::Result<()> {
    let raw = vec![
        make_raw("dent", 0.0, [0, 0, 5, 5]),
        make_raw("dent", 1.0, [0, 0, 5, 5]),
    ];
    assert_eq!(normalize(&raw)?.len(), 2);
    Ok(())
}

#[test]
fn test_normalize_rejects_out_of_range_confidence() {
    for confidence in [-0.1, 1.5, f32::NAN, f32::INFINITY] {
        let raw = vec![make_raw("dent", confidence, [0, 0, 5, 5])];
        let err = normalize(&raw).unwrap_err();
        assert!(
            matches!(err, InspectionError::MalformedDetection(_)),
            "confidence {confidence} should be malformed, got: {err}"
        );
    }
}

#[test]
fn test_normalize_rejects_bad_boxes() {
    let cases = [
        [-1, 0, 5, 5],  // negative coordinate
        [0, -3, 5, 5],  // negative coordinate
        [5, 0, 5, 10],  // zero width
        [0, 5, 10, 5],  // zero height
        [20, 0, 10, 5], // inverted x
        [0, 20, 5, 10], // inverted y
    ];
    for bbox in cases {
        let raw = vec![make_raw("dent", 0.5, bbox)];
        let err = normalize(&raw).unwrap_err();
        assert!(
            matches!(err, InspectionError::MalformedDetection(_)),
            "bbox {bbox:?} should be malformed, got: {err}"
        );
    }
}

#[test]
fn test_one_bad_finding_fails_the_whole_set() {
    let raw = vec![
        make_raw("dent", 0.5, [0, 0, 5, 5]),
        make_raw("scratch", 2.0, [0, 0, 5, 5]),
    ];
    assert!(normalize(&raw).is_err());
}
