use std::future::Future;

use time::OffsetDateTime;

use crate::error::LedgerError;
use crate::models::{Finding, OperatorRef, VehicleStatus};

/// One persisted inspection outcome. Immutable once written; constructed
/// only by the ledger.
#[derive(Debug, Clone)]
pub struct InspectionRecord {
    pub id: i64,
    pub operator: OperatorRef,
    pub source_image: String,
    pub annotated_image: String,
    pub status: VehicleStatus,
    /// Display-ready class summary, e.g. "dent, scratch" or "None".
    pub defect_classes: String,
    /// Display-ready confidence summary, e.g. "41.98%, 87.00%" or "N/A".
    pub confidence_scores: String,
    pub finding_count: u32,
    pub created_at: OffsetDateTime,
    pub(super) _guard: (),
}

/// Input to `InspectionRepository::create`. The ledger derives the stored
/// summary text and finding count from `findings`, so
/// `finding_count == findings.len()` holds by construction.
#[derive(Debug, Clone)]
pub struct NewInspection<'a> {
    pub source_image: &'a str,
    pub annotated_image: &'a str,
    pub status: VehicleStatus,
    pub findings: &'a [Finding],
}

impl NewInspection<'_> {
    pub(super) fn defect_classes(&self) -> String {
        if self.findings.is_empty() {
            return "None".to_string();
        }
        self.findings
            .iter()
            .map(|f| f.class_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub(super) fn confidence_scores(&self) -> String {
        if self.findings.is_empty() {
            return "N/A".to_string();
        }
        self.findings
            .iter()
            .map(|f| f.confidence_percent())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Aggregate counts over one operator's full record set, computed live.
/// `total == pass_count + fail_count` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectionStats {
    pub total: u64,
    pub pass_count: u64,
    pub fail_count: u64,
}

/// Append-and-read interface of the inspection ledger. Every query is
/// scoped to the operator the repository is bound to; no call can return
/// another operator's records.
pub trait InspectionRepository {
    /// Persist one record atomically. Assigns identity and server
    /// timestamp; on failure no partial record is visible to readers.
    fn create(
        &self,
        inspection: &NewInspection<'_>,
    ) -> impl Future<Output = Result<InspectionRecord, LedgerError>>;

    /// Newest records first, capped at `limit`. Timestamp ties break by
    /// descending identity, i.e. assignment order.
    fn recent(
        &self,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<InspectionRecord>, LedgerError>>;

    /// All records, same ordering as `recent`, unbounded.
    fn all(&self) -> impl Future<Output = Result<Vec<InspectionRecord>, LedgerError>>;

    /// Status counts over the same record set `all` sees, never cached.
    fn aggregate(&self) -> impl Future<Output = Result<InspectionStats, LedgerError>>;
}
