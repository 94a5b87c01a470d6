mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from autoinspect for tests
pub use autoinspect::core::db::{
    InspectionRecord, InspectionRepository, InspectionStats, LedgerDb, NewInspection,
};
pub use autoinspect::{
    Annotator, BoundingBox, Finding, OperatorRef, RawDetection, StyleTable, VehicleStatus,
};
