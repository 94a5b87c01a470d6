use std::io::Cursor;
use std::time::Duration;

use autoinspect::core::db::LedgerDb;
use autoinspect::detection::Detector;
use autoinspect::{BoundingBox, Finding, OperatorRef, RawDetection};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use tempfile::TempDir;

/// Creates a LedgerDb backed by a database file in a temp directory.
/// Returns both; the temp directory must be kept alive.
pub async fn create_test_ledger() -> (LedgerDb, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let ledger = LedgerDb::open(dir.path().join("test.db"))
        .await
        .expect("Failed to open test ledger");
    (ledger, dir)
}

/// A plain gray test image of the given dimensions.
pub fn test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |_, _| {
        Rgb([128u8, 128u8, 128u8])
    }))
}

/// PNG-encoded bytes of a plain gray test image.
pub fn test_image_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    test_image(width, height)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode test image");
    bytes
}

pub fn op(name: &str) -> OperatorRef {
    OperatorRef::new(name)
}

pub fn make_finding(class_name: &str, confidence: f32, bbox: (u32, u32, u32, u32)) -> Finding {
    Finding {
        class_name: class_name.to_string(),
        confidence,
        bbox: BoundingBox {
            x1: bbox.0,
            y1: bbox.1,
            x2: bbox.2,
            y2: bbox.3,
        },
    }
}

pub fn make_raw(class_name: &str, confidence: f32, bbox: [i64; 4]) -> RawDetection {
    RawDetection {
        class_name: class_name.to_string(),
        confidence,
        bbox,
    }
}

/// Detector stub that replays a fixed set of raw detections.
#[derive(Debug, Clone)]
pub struct StaticDetector(pub Vec<RawDetection>);

impl Detector for StaticDetector {
    async fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<RawDetection>> {
        Ok(self.0.clone())
    }
}

/// Detector stub whose backend is always down.
#[derive(Debug, Clone)]
pub struct FailingDetector;

impl Detector for FailingDetector {
    async fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<RawDetection>> {
        Err(anyhow::anyhow!("detector backend offline"))
    }
}

/// Detector stub that stalls long enough to trip any short timeout.
#[derive(Debug, Clone)]
pub struct SlowDetector(pub Duration);

impl Detector for SlowDetector {
    async fn detect(&self, _image: &DynamicImage) -> anyhow::Result<Vec<RawDetection>> {
        tokio::time::sleep(self.0).await;
        Ok(Vec::new())
    }
}
