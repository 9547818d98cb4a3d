// SQRL Store - Identity Store
//
// Validates keys, converts between `Identity` and `PersistedRecord`, and
// drives the engine. Key design decision: the transient record built for a
// find or save is always scrubbed before the call returns, while the
// `Identity` handed back to the caller is only scrubbed if the caller asks
// for it via `find_secure`.

use std::fs;
use std::time::Duration;

use super::validation::validate_key;
use super::{
    to_identity, to_record, IdentityEngine, OpContext, Result, SqliteEngine, StorageError,
    StoreError,
};
use crate::config::StoreConfig;
use crate::hygiene::{Scrubber, SecureIdentity};
use crate::identity::Identity;

/// Handle to an identity store. Holds the engine; no other state is shared
/// between calls.
pub struct IdentityStore<E = SqliteEngine> {
    engine: E,
    scrubber: Scrubber,
    default_timeout: Option<Duration>,
}

impl IdentityStore<SqliteEngine> {
    /// Open the SQLite database described by `config` and sync its schema.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Backend(format!("cannot create data directory: {e}")))?;
            }
        }

        let engine = SqliteEngine::open(&config.database_path, config.busy_timeout())?;
        let mut store = Self::new(engine);
        store.default_timeout = config.operation_timeout();
        store.ensure_schema(&store.default_context())?;

        tracing::info!(path = %config.database_path.display(), "Identity store opened");
        Ok(store)
    }

    /// Open a private in-memory SQLite store with its schema in place.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self::new(SqliteEngine::open_in_memory()?);
        store.ensure_schema(&OpContext::background())?;
        Ok(store)
    }
}

impl<E: IdentityEngine> IdentityStore<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            scrubber: Scrubber::default(),
            default_timeout: None,
        }
    }

    /// Use `scrubber` for transient records and `find_secure` wrappers.
    pub fn with_scrubber(mut self, scrubber: Scrubber) -> Self {
        self.scrubber = scrubber;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// A context carrying the configured operation timeout, or a background
    /// context when none is configured.
    pub fn default_context(&self) -> OpContext {
        match self.default_timeout {
            Some(timeout) => OpContext::background().with_timeout(timeout),
            None => OpContext::background(),
        }
    }

    /// Create the identity table if needed. Safe to call repeatedly.
    pub fn ensure_schema(&self, ctx: &OpContext) -> Result<()> {
        ctx.check()?;
        self.engine.sync_schema(ctx)?;
        Ok(())
    }

    /// Load the identity stored under `key`.
    pub fn find(&self, key: &str, ctx: &OpContext) -> Result<Identity> {
        if let Err(e) = validate_key(key) {
            tracing::warn!(error = %e, "Rejected identity lookup");
            return Err(e.into());
        }
        ctx.check()?;

        let mut record = match self.engine.lookup(key, ctx) {
            Ok(record) => record,
            Err(e) if e.is_row_not_found() => {
                tracing::debug!(key = %key, "Identity not found");
                return Err(StoreError::NotFound);
            }
            Err(e) => return Err(e.into()),
        };

        let identity = to_identity(&record);
        record.scrub(&self.scrubber);

        tracing::debug!(key = %key, "Identity loaded");
        Ok(identity)
    }

    /// Like `find`, but the result is owned by a wrapper that scrubs it on
    /// `destroy()` or drop.
    pub fn find_secure(&self, key: &str, ctx: &OpContext) -> Result<SecureIdentity> {
        let identity = self.find(key, ctx)?;
        Ok(SecureIdentity::with_scrubber(identity, self.scrubber.clone()))
    }

    /// Insert or fully overwrite the identity under its key. Accepts
    /// `&Identity` or `Option<&Identity>`; `None` fails with `NilInput`.
    pub fn save<'a>(&self, identity: impl Into<Option<&'a Identity>>, ctx: &OpContext) -> Result<()> {
        let identity = identity.into().ok_or(StoreError::NilInput)?;
        if let Err(e) = validate_key(&identity.key) {
            tracing::warn!(error = %e, "Rejected identity save");
            return Err(e.into());
        }
        ctx.check()?;

        let mut record = to_record(identity);
        let result = self.engine.upsert(&record, ctx);
        record.scrub(&self.scrubber);
        result?;

        tracing::debug!(key = %identity.key, "Identity saved");
        Ok(())
    }

    /// Remove the identity under `key`. Removing an absent key succeeds.
    pub fn delete(&self, key: &str, ctx: &OpContext) -> Result<()> {
        if let Err(e) = validate_key(key) {
            tracing::warn!(error = %e, "Rejected identity delete");
            return Err(e.into());
        }
        ctx.check()?;

        self.engine.remove(key, ctx)?;
        tracing::info!(key = %key, "Identity deleted");
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
