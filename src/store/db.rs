// SQRL Store - SQLite engine
//
// Opens and initializes the identity database. Each call locks the
// connection for its own duration only. While a statement runs, a progress
// handler polls the caller's context and interrupts SQLite once it is
// cancelled or past its deadline.

use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::{IdentityEngine, OpContext, PersistedRecord, StorageError};

/// SQLite VM instructions between cancellation checks.
const PROGRESS_INTERVAL: i32 = 1000;

const CREATE_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS sqrl_identities (
        idk         TEXT PRIMARY KEY NOT NULL,
        suk         TEXT NOT NULL,
        vuk         TEXT NOT NULL,
        pidk        TEXT,
        rekeyed     TEXT,
        sqrl_only   INTEGER NOT NULL DEFAULT 0,
        hardlock    INTEGER NOT NULL DEFAULT 0,
        disabled    INTEGER NOT NULL DEFAULT 0,
        btn         INTEGER NOT NULL DEFAULT 0
    );
";

/// Identity engine backed by a single SQLite connection.
pub struct SqliteEngine {
    conn: Mutex<Connection>,
}

impl SqliteEngine {
    /// Open (or create) the database file at `path`. The schema is not
    /// created until `sync_schema` runs.
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        tracing::debug!(path = %path.display(), "Identity database opened");
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Backend("connection lock poisoned".to_string()))
    }

    /// Run `op` on the connection with the context wired into SQLite's
    /// progress handler.
    fn with_conn<T>(
        &self,
        ctx: &OpContext,
        op: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StorageError> {
        let conn = self.lock()?;
        ctx.check()?;

        let watched = AssertUnwindSafe(ctx.clone());
        conn.progress_handler(
            PROGRESS_INTERVAL,
            Some(move || {
                let ctx = &watched;
                ctx.0.is_done()
            }),
        );

        let result = op(&conn);
        conn.progress_handler(0, None::<fn() -> bool>);

        result.map_err(|err| interrupt_to_storage_error(err, ctx))
    }

    /// Run an arbitrary read against the connection. Used by tests to
    /// inspect the raw table.
    #[cfg(test)]
    pub(crate) fn query_scalar(&self, sql: &str) -> rusqlite::Result<i64> {
        let conn = self.conn.lock().map_err(|_| rusqlite::Error::InvalidQuery)?;
        conn.query_row(sql, [], |row| row.get(0))
    }
}

/// An interrupted statement means our progress handler fired; report it in
/// terms of the context that caused it.
fn interrupt_to_storage_error(err: rusqlite::Error, ctx: &OpContext) -> StorageError {
    let interrupted = matches!(
        &err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::OperationInterrupted
    );
    if interrupted {
        if let Err(reason) = ctx.check() {
            return reason;
        }
    }
    StorageError::Database(err)
}

impl IdentityEngine for SqliteEngine {
    fn sync_schema(&self, ctx: &OpContext) -> Result<(), StorageError> {
        self.with_conn(ctx, |conn| conn.execute_batch(CREATE_SCHEMA))?;
        tracing::debug!("Identity schema synchronized");
        Ok(())
    }

    fn lookup(&self, idk: &str, ctx: &OpContext) -> Result<PersistedRecord, StorageError> {
        let record = self.with_conn(ctx, |conn| {
            conn.query_row(
                "SELECT idk, suk, vuk, pidk, rekeyed, sqrl_only, hardlock, disabled, btn
                 FROM sqrl_identities WHERE idk = ?1",
                params![idk],
                |row| {
                    Ok(PersistedRecord {
                        idk: row.get(0)?,
                        suk: row.get(1)?,
                        vuk: row.get(2)?,
                        pidk: row.get(3)?,
                        rekeyed: row.get(4)?,
                        sqrl_only: row.get(5)?,
                        hardlock: row.get(6)?,
                        disabled: row.get(7)?,
                        btn: row.get(8)?,
                    })
                },
            )
            .optional()
        })?;

        record.ok_or(StorageError::RowNotFound)
    }

    fn upsert(&self, record: &PersistedRecord, ctx: &OpContext) -> Result<(), StorageError> {
        self.with_conn(ctx, |conn| {
            conn.execute(
                "INSERT INTO sqrl_identities
                    (idk, suk, vuk, pidk, rekeyed, sqrl_only, hardlock, disabled, btn)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(idk) DO UPDATE SET
                    suk = excluded.suk,
                    vuk = excluded.vuk,
                    pidk = excluded.pidk,
                    rekeyed = excluded.rekeyed,
                    sqrl_only = excluded.sqrl_only,
                    hardlock = excluded.hardlock,
                    disabled = excluded.disabled,
                    btn = excluded.btn",
                params![
                    record.idk,
                    record.suk,
                    record.vuk,
                    record.pidk,
                    record.rekeyed,
                    record.sqrl_only,
                    record.hardlock,
                    record.disabled,
                    record.btn,
                ],
            )
        })?;
        Ok(())
    }

    fn remove(&self, idk: &str, ctx: &OpContext) -> Result<(), StorageError> {
        let affected = self.with_conn(ctx, |conn| {
            conn.execute("DELETE FROM sqrl_identities WHERE idk = ?1", params![idk])
        })?;
        tracing::debug!(idk = %idk, affected, "Identity row delete executed");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
