// SQRL Store - In-memory engine
//
// HashMap-backed engine for tests and embedding. Counts every I/O call so
// callers can assert that a rejected operation never reached the engine.
// Rows that are overwritten or removed are scrubbed before being dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{IdentityEngine, OpContext, PersistedRecord, StorageError};
use crate::hygiene::Scrubber;

#[derive(Debug, Default)]
pub struct MemoryEngine {
    rows: RwLock<HashMap<String, PersistedRecord>>,
    io_count: AtomicU64,
    scrubber: Scrubber,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of engine calls that passed the context check.
    pub fn io_count(&self) -> u64 {
        self.io_count.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn begin(&self, ctx: &OpContext) -> Result<(), StorageError> {
        ctx.check()?;
        self.io_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, PersistedRecord>>, StorageError> {
        self.rows
            .read()
            .map_err(|_| StorageError::Backend("identity map lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, PersistedRecord>>, StorageError> {
        self.rows
            .write()
            .map_err(|_| StorageError::Backend("identity map lock poisoned".to_string()))
    }
}

impl IdentityEngine for MemoryEngine {
    fn sync_schema(&self, ctx: &OpContext) -> Result<(), StorageError> {
        self.begin(ctx)
    }

    fn lookup(&self, idk: &str, ctx: &OpContext) -> Result<PersistedRecord, StorageError> {
        self.begin(ctx)?;
        self.read()?
            .get(idk)
            .cloned()
            .ok_or(StorageError::RowNotFound)
    }

    fn upsert(&self, record: &PersistedRecord, ctx: &OpContext) -> Result<(), StorageError> {
        self.begin(ctx)?;
        let previous = self.write()?.insert(record.idk.clone(), record.clone());
        if let Some(mut old) = previous {
            old.scrub(&self.scrubber);
        }
        Ok(())
    }

    fn remove(&self, idk: &str, ctx: &OpContext) -> Result<(), StorageError> {
        self.begin(ctx)?;
        let removed = self.write()?.remove(idk);
        if let Some(mut old) = removed {
            old.scrub(&self.scrubber);
        }
        Ok(())
    }
}

impl Drop for MemoryEngine {
    fn drop(&mut self) {
        if let Ok(rows) = self.rows.get_mut() {
            for (_, mut record) in rows.drain() {
                record.scrub(&self.scrubber);
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Identity;
    use crate::store::to_record;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_lookup_missing_is_row_not_found() {
        let engine = MemoryEngine::new();
        let err = engine.lookup("abc", &OpContext::background()).unwrap_err();
        assert!(err.is_row_not_found());
    }

    #[test]
    fn test_upsert_then_lookup() {
        let engine = MemoryEngine::new();
        let ctx = OpContext::background();
        let record = to_record(&Identity::new("abc", "s1", "v1"));

        engine.upsert(&record, &ctx).unwrap();
        assert_eq!(engine.lookup("abc", &ctx).unwrap(), record);
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.io_count(), 2);
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let engine = MemoryEngine::new();
        assert!(engine.remove("ghost", &OpContext::background()).is_ok());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_cancelled_context_performs_no_io() {
        let engine = MemoryEngine::new();
        let token = CancellationToken::new();
        token.cancel();
        let ctx = OpContext::background().with_token(token);

        let record = to_record(&Identity::new("abc", "s1", "v1"));
        let err = engine.upsert(&record, &ctx).unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(engine.io_count(), 0);
        assert!(engine.is_empty());
    }
}
