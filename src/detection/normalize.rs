use tracing::warn;

use crate::detection::RawDetection;
use crate::error::InspectionError;
use crate::models::{BoundingBox, Finding};

/// Validate and canonicalize raw detector output into an ordered finding
/// set. Emission order is preserved so rendering and serialization stay
/// deterministic.
///
/// Structural validation only: a non-finite confidence, a confidence
/// outside [0, 1], negative coordinates, or a degenerate/inverted box
/// fail the whole set with `MalformedDetection`, since any of these means
/// the capability violated its contract. Confidence is never thresholded
/// here, and unknown class names pass through untouched; class-level
/// styling is the annotator's concern.
pub fn normalize(raw: &[RawDetection]) -> Result<Vec<Finding>, InspectionError> {
    raw.iter().map(normalize_one).collect()
}

fn normalize_one(raw: &RawDetection) -> Result<Finding, InspectionError> {
    if !raw.confidence.is_finite() || !(0.0..=1.0).contains(&raw.confidence) {
        warn!(class = %raw.class_name, confidence = raw.confidence, "detector emitted invalid confidence");
        return Err(InspectionError::MalformedDetection(format!(
            "confidence {} for class '{}' is outside [0, 1]",
            raw.confidence, raw.class_name
        )));
    }

    let [x1, y1, x2, y2] = raw.bbox;
    if x1 < 0 || y1 < 0 {
        warn!(class = %raw.class_name, bbox = ?raw.bbox, "detector emitted negative coordinates");
        return Err(InspectionError::MalformedDetection(format!(
            "bounding box {:?} for class '{}' has negative coordinates",
            raw.bbox, raw.class_name
        )));
    }
    if x1 >= x2 || y1 >= y2 {
        warn!(class = %raw.class_name, bbox = ?raw.bbox, "detector emitted degenerate bounding box");
        return Err(InspectionError::MalformedDetection(format!(
            "bounding box {:?} for class '{}' is degenerate or inverted",
            raw.bbox, raw.class_name
        )));
    }

    Ok(Finding {
        class_name: raw.class_name.clone(),
        confidence: raw.confidence,
        bbox: BoundingBox {
            x1: x1 as u32,
            y1: y1 as u32,
            x2: x2 as u32,
            y2: y2 as u32,
        },
    })
}
