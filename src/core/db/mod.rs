mod record;
mod state;

use std::path::Path;
use std::sync::Arc;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use crate::error::LedgerError;
use crate::models::{OperatorRef, VehicleStatus};
use state::LedgerState;

pub use record::{InspectionRecord, InspectionRepository, InspectionStats, NewInspection};

const RECORD_COLUMNS: &str = "id, operator, source_image, annotated_image, status, \
     defect_classes, confidence_scores, finding_count, created_at";

/// Handle to the inspection ledger database. Cheap to clone; all record
/// access goes through an operator-bound repository obtained from
/// [`LedgerDb::operator`], which is the sole access-control boundary the
/// core enforces itself.
#[derive(Debug, Clone)]
pub struct LedgerDb {
    state: Arc<LedgerState>,
}

impl LedgerDb {
    pub async fn open<P: AsRef<Path>>(db_file: P) -> Result<Self, LedgerError> {
        Ok(Self {
            state: Arc::new(LedgerState::open(db_file).await?),
        })
    }

    /// Bind a repository to one operator. Every query made through the
    /// returned handle is scoped to that operator's records.
    pub fn operator(&self, operator: &OperatorRef) -> OperatorLedger {
        OperatorLedger {
            state: self.state.clone(),
            operator: operator.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperatorLedger {
    state: Arc<LedgerState>,
    operator: OperatorRef,
}

impl InspectionRepository for OperatorLedger {
    async fn create(
        &self,
        inspection: &NewInspection<'_>,
    ) -> Result<InspectionRecord, LedgerError> {
        // Second precision keeps the stored RFC 3339 text fixed-width, so
        // lexicographic ordering is chronological; same-second ties fall
        // through to the id tie-break.
        let created_at = OffsetDateTime::now_utc()
            .replace_nanosecond(0)
            .map_err(|e| LedgerError::Corrupt(format!("unformattable timestamp: {e}")))?;
        let created_at_text = created_at
            .format(&Rfc3339)
            .map_err(|e| LedgerError::Corrupt(format!("unformattable timestamp: {e}")))?;
        let finding_count = inspection.findings.len() as i64;

        // Single INSERT..RETURNING: identity assignment and the append are
        // one atomic statement, so concurrent creates never collide on id
        // or expose a partial row.
        let sql = format!(
            "INSERT INTO inspection \
             (operator, source_image, annotated_image, status, defect_classes, \
              confidence_scores, finding_count, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {RECORD_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(self.operator.as_str())
            .bind(inspection.source_image)
            .bind(inspection.annotated_image)
            .bind(inspection.status.as_str())
            .bind(inspection.defect_classes())
            .bind(inspection.confidence_scores())
            .bind(finding_count)
            .bind(&created_at_text)
            .fetch_one(self.state.pool())
            .await
            .map_err(LedgerError::Write)?;
        let record = row_to_record(&row)?;
        info!(
            id = record.id,
            operator = %record.operator,
            status = %record.status,
            finding_count = record.finding_count,
            "inspection record persisted"
        );
        Ok(record)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<InspectionRecord>, LedgerError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM inspection \
             WHERE operator = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query(&sql)
            .bind(self.operator.as_str())
            .bind(limit as i64)
            .fetch_all(self.state.pool())
            .await
            .map_err(LedgerError::Query)?
            .iter()
            .map(row_to_record)
            .collect()
    }

    async fn all(&self) -> Result<Vec<InspectionRecord>, LedgerError> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM inspection \
             WHERE operator = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query(&sql)
            .bind(self.operator.as_str())
            .fetch_all(self.state.pool())
            .await
            .map_err(LedgerError::Query)?
            .iter()
            .map(row_to_record)
            .collect()
    }

    async fn aggregate(&self) -> Result<InspectionStats, LedgerError> {
        let row = sqlx::query(
            "SELECT \
                COUNT(*) AS total, \
                COALESCE(SUM(CASE WHEN status = 'pass' THEN 1 ELSE 0 END), 0) AS pass_count, \
                COALESCE(SUM(CASE WHEN status = 'fail' THEN 1 ELSE 0 END), 0) AS fail_count \
             FROM inspection WHERE operator = $1",
        )
        .bind(self.operator.as_str())
        .fetch_one(self.state.pool())
        .await
        .map_err(LedgerError::Query)?;

        Ok(InspectionStats {
            total: get_count(&row, "total")?,
            pass_count: get_count(&row, "pass_count")?,
            fail_count: get_count(&row, "fail_count")?,
        })
    }
}

fn get_count(row: &SqliteRow, column: &str) -> Result<u64, LedgerError> {
    let value: i64 = row.try_get(column).map_err(LedgerError::Query)?;
    value
        .try_into()
        .map_err(|_| LedgerError::Corrupt(format!("negative {column}: {value}")))
}

fn row_to_record(row: &SqliteRow) -> Result<InspectionRecord, LedgerError> {
    let status_text: String = row.try_get("status").map_err(LedgerError::Query)?;
    let status = VehicleStatus::try_from(status_text.as_str())
        .map_err(|e| LedgerError::Corrupt(e.to_string()))?;

    let created_at_text: String = row.try_get("created_at").map_err(LedgerError::Query)?;
    let created_at = OffsetDateTime::parse(&created_at_text, &Rfc3339)
        .map_err(|e| LedgerError::Corrupt(format!("bad created_at '{created_at_text}': {e}")))?;

    let finding_count: i64 = row.try_get("finding_count").map_err(LedgerError::Query)?;
    let finding_count = finding_count
        .try_into()
        .map_err(|_| LedgerError::Corrupt(format!("negative finding_count: {finding_count}")))?;

    let operator: String = row.try_get("operator").map_err(LedgerError::Query)?;

    Ok(InspectionRecord {
        id: row.try_get("id").map_err(LedgerError::Query)?,
        operator: OperatorRef::new(operator),
        source_image: row.try_get("source_image").map_err(LedgerError::Query)?,
        annotated_image: row.try_get("annotated_image").map_err(LedgerError::Query)?,
        status,
        defect_classes: row.try_get("defect_classes").map_err(LedgerError::Query)?,
        confidence_scores: row.try_get("confidence_scores").map_err(LedgerError::Query)?,
        finding_count,
        created_at,
        _guard: (),
    })
}
