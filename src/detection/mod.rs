pub mod normalize;

use std::future::Future;
use std::path::PathBuf;

use image::DynamicImage;
use serde::Deserialize;

/// Default minimum-confidence cutoff handed to the detection capability.
/// Deliberately permissive so subtle defects surface; the normalizer
/// never re-filters by confidence.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.05;

/// One raw finding as emitted by the detection capability, prior to
/// validation. Coordinates are signed because the capability contract
/// only promises "four integers"; the normalizer rejects anything a
/// pixel grid cannot express.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDetection {
    pub class_name: String,
    pub confidence: f32,
    /// [x1, y1, x2, y2] in pixel coordinates.
    pub bbox: [i64; 4],
}

/// Boundary to the external object-detection capability. The model, its
/// training, and its inference runtime live behind this trait and are
/// not reimplemented here. Implementations report failures as plain
/// errors; the orchestrator maps any failure (or a timeout) to
/// `InspectionError::DetectionUnavailable`.
pub trait Detector {
    fn detect(
        &self,
        image: &DynamicImage,
    ) -> impl Future<Output = anyhow::Result<Vec<RawDetection>>>;
}

/// Adapter that replays a detector run serialized as a JSON array of raw
/// detections. Used by the CLI, where inference happens out of process,
/// and by tests. Applies the capability-side minimum-confidence cutoff;
/// emission order is preserved.
#[derive(Debug, Clone)]
pub struct JsonDetector {
    path: PathBuf,
    min_confidence: f32,
}

impl JsonDetector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

impl Detector for JsonDetector {
    async fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<RawDetection>> {
        let raw = tokio::fs::read(&self.path).await?;
        let detections: Vec<RawDetection> = serde_json::from_slice(&raw)?;
        Ok(detections
            .into_iter()
            .filter(|d| d.confidence >= self.min_confidence)
            .collect())
    }
}
