use std::path::Path;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::debug;

use crate::error::LedgerError;

pub(super) struct LedgerState {
    pool: SqlitePool,
}

impl std::fmt::Debug for LedgerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerState").finish_non_exhaustive()
    }
}

impl LedgerState {
    /// Open (or create) the ledger database and bring the schema up to
    /// date. WAL mode keeps concurrent operator reads off the write path;
    /// identity assignment itself is serialized by SQLite's atomic insert.
    pub(super) async fn open<P: AsRef<Path>>(db_file: P) -> Result<Self, LedgerError> {
        let connect_opts = SqliteConnectOptions::new()
            .filename(db_file.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_opts)
            .await
            .map_err(LedgerError::Open)?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        debug!(db_file = %db_file.as_ref().display(), "ledger database opened");
        Ok(Self { pool })
    }

    pub(super) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
