use thiserror::Error;

/// Failures of the inspection ledger. Every variant leaves the database
/// without a partial record: inserts are single atomic statements.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("failed to open ledger database")]
    Open(#[source] sqlx::Error),
    #[error("failed to run ledger migrations")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("ledger write failed")]
    Write(#[source] sqlx::Error),
    #[error("ledger query failed")]
    Query(#[source] sqlx::Error),
    #[error("ledger row is corrupt: {0}")]
    Corrupt(String),
}

/// Per-request failure taxonomy of the inspection pipeline. No variant
/// ever corresponds to a persisted record; persistence is all-or-nothing
/// per upload.
#[derive(Debug, Error)]
pub enum InspectionError {
    /// Bad or unsupported upload. User-correctable, reported inline.
    #[error("invalid image: {0}")]
    InvalidImage(String),
    /// The detector violated its output contract. Fatal to the request
    /// and logged for investigation.
    #[error("malformed detection output: {0}")]
    MalformedDetection(String),
    /// Capability unreachable or timed out. Safe to retry by resubmission.
    #[error("detection capability unavailable: {0}")]
    DetectionUnavailable(String),
    #[error("inspection could not be persisted")]
    Persistence(#[from] LedgerError),
    #[error("image storage failed")]
    Storage(#[source] std::io::Error),
    #[error("failed to encode annotated image")]
    Encode(#[source] image::ImageError),
}
