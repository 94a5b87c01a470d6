use std::io::Cursor;
use std::time::Duration;

use image::ImageFormat;
use tracing::{debug, info};

use crate::annotate::Annotator;
use crate::classify::classify;
use crate::core::db::{InspectionRepository, LedgerDb, NewInspection};
use crate::detection::Detector;
use crate::detection::normalize::normalize;
use crate::error::InspectionError;
use crate::models::{OperatorRef, VehicleStatus};
use crate::store::{ImageStore, RESULT_AREA, UPLOAD_AREA, storage_key};

pub const DEFAULT_DETECT_TIMEOUT: Duration = Duration::from_secs(30);

/// One finding as presented back to the caller: class plus formatted
/// confidence, matching what the ledger stores.
#[derive(Debug, Clone)]
pub struct DetectionSummary {
    pub class_name: String,
    pub confidence: String,
}

/// Display-ready result of one processed upload.
#[derive(Debug, Clone)]
pub struct InspectionSummary {
    pub record_id: i64,
    pub status: VehicleStatus,
    pub detections: Vec<DetectionSummary>,
    pub source_image: String,
    pub annotated_image: String,
    pub finding_count: u32,
}

/// Composes the per-upload flow: decode and gate the upload, store the
/// untouched source, invoke the external detection capability under a
/// timeout, normalize, classify, annotate, store the artifact, persist.
/// Each step is a hard dependency on the previous one succeeding, and no
/// step is skipped for a clean image; a zero-finding upload still yields
/// an annotated artifact and a `pass` record so the audit trail is
/// complete.
pub struct InspectionPipeline<D, S> {
    detector: D,
    store: S,
    annotator: Annotator,
    ledger: LedgerDb,
    detect_timeout: Duration,
}

impl<D: Detector, S: ImageStore> InspectionPipeline<D, S> {
    pub fn new(detector: D, store: S, annotator: Annotator, ledger: LedgerDb) -> Self {
        Self {
            detector,
            store,
            annotator,
            ledger,
            detect_timeout: DEFAULT_DETECT_TIMEOUT,
        }
    }

    /// Bound the detection-capability invocation. Elapsing the bound is a
    /// `DetectionUnavailable` failure; retry policy belongs to the caller.
    pub fn with_detect_timeout(mut self, timeout: Duration) -> Self {
        self.detect_timeout = timeout;
        self
    }

    pub async fn process(
        &self,
        operator: &OperatorRef,
        image_bytes: &[u8],
    ) -> Result<InspectionSummary, InspectionError> {
        let format = image::guess_format(image_bytes)
            .map_err(|e| InspectionError::InvalidImage(e.to_string()))?;
        let extension = match format {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            other => {
                return Err(InspectionError::InvalidImage(format!(
                    "unsupported format {other:?}; only JPEG and PNG uploads are accepted"
                )));
            }
        };
        let image = image::load_from_memory_with_format(image_bytes, format)
            .map_err(|e| InspectionError::InvalidImage(e.to_string()))?;
        debug!(
            operator = %operator,
            width = image.width(),
            height = image.height(),
            "upload decoded"
        );

        let source_key = storage_key(UPLOAD_AREA, operator, extension);
        let source_ref = self
            .store
            .put(&source_key, image_bytes)
            .await
            .map_err(InspectionError::Storage)?;

        let raw = tokio::time::timeout(self.detect_timeout, self.detector.detect(&image))
            .await
            .map_err(|_| {
                InspectionError::DetectionUnavailable(format!(
                    "detection timed out after {:?}",
                    self.detect_timeout
                ))
            })?
            .map_err(|e| InspectionError::DetectionUnavailable(e.to_string()))?;
        debug!(operator = %operator, detections = raw.len(), "detector returned");

        let findings = normalize(&raw)?;
        let status = classify(&findings);

        let annotated = self.annotator.annotate(&image, &findings);
        let mut encoded = Vec::new();
        annotated
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(InspectionError::Encode)?;
        let result_key = storage_key(RESULT_AREA, operator, "png");
        let annotated_ref = self
            .store
            .put(&result_key, &encoded)
            .await
            .map_err(InspectionError::Storage)?;

        let record = self
            .ledger
            .operator(operator)
            .create(&NewInspection {
                source_image: &source_ref,
                annotated_image: &annotated_ref,
                status,
                findings: &findings,
            })
            .await?;
        info!(
            operator = %operator,
            record_id = record.id,
            status = %status,
            finding_count = record.finding_count,
            "inspection processed"
        );

        Ok(InspectionSummary {
            record_id: record.id,
            status,
            detections: findings
                .iter()
                .map(|f| DetectionSummary {
                    class_name: f.class_name.clone(),
                    confidence: f.confidence_percent(),
                })
                .collect(),
            source_image: source_ref,
            annotated_image: annotated_ref,
            finding_count: record.finding_count,
        })
    }
}
