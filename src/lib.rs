// SQRL Store - Library root
//
// Persistence for SQRL authentication identities: key validation, record
// conversion, a cancellable CRUD store, and secret-memory hygiene.

pub mod config;
pub mod hygiene;
pub mod identity;
pub mod store;

pub use config::{ConfigError, StoreConfig};
pub use hygiene::{SecureIdentity, WrapperDestroyed};
pub use identity::Identity;
pub use store::{
    IdentityEngine, IdentityStore, MemoryEngine, OpContext, Result, SqliteEngine, StorageError,
    StoreError, ValidationError,
};
