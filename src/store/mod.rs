// SQRL Store - Store Module
//
// Validated, cancellable CRUD over SQRL identities. Keys are checked before
// any I/O, identities are mapped to storage records, and the transient
// records are scrubbed once each call is finished with them.

mod context;
mod db;
mod engine;
mod error;
mod memory;
mod record;
mod repository;
mod validation;

pub use context::OpContext;
pub use db::SqliteEngine;
pub use engine::IdentityEngine;
pub use error::{Result, StorageError, StoreError, ValidationError};
pub use memory::MemoryEngine;
pub use record::{to_identity, to_record, PersistedRecord};
pub use repository::IdentityStore;
pub use validation::{validate_key, MAX_KEY_LEN};
