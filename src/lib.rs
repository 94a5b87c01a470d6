pub mod annotate;
pub mod classify;
pub mod core;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod store;

pub use annotate::{Annotator, Color, StyleTable};
pub use classify::classify;
pub use detection::{Detector, JsonDetector, RawDetection};
pub use error::{InspectionError, LedgerError};
pub use models::{BoundingBox, Finding, OperatorRef, VehicleStatus};
pub use pipeline::{DetectionSummary, InspectionPipeline, InspectionSummary};
pub use store::{FsImageStore, ImageStore};
