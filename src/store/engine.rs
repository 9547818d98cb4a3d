// SQRL Store - Storage engine abstraction
//
// The backing engine sees only `PersistedRecord`s and pre-validated keys.
// Engines must report a missing row through `StorageError::is_row_not_found`
// and honor the supplied context at least before issuing I/O.

use super::{OpContext, PersistedRecord, StorageError};

pub trait IdentityEngine: Send + Sync {
    /// Create the identity table if it does not exist. Idempotent.
    fn sync_schema(&self, ctx: &OpContext) -> Result<(), StorageError>;

    /// Fetch the row for `idk`.
    fn lookup(&self, idk: &str, ctx: &OpContext) -> Result<PersistedRecord, StorageError>;

    /// Insert the row, or overwrite every column of an existing one.
    fn upsert(&self, record: &PersistedRecord, ctx: &OpContext) -> Result<(), StorageError>;

    /// Delete the row for `idk`. A missing row is not an error.
    fn remove(&self, idk: &str, ctx: &OpContext) -> Result<(), StorageError>;
}
