// SQRL Store - Secure identity wrapper
//
// Single-owner handle over one Identity. `destroy()` scrubs the identity
// exactly once; later calls are no-ops. Dropping a live wrapper destroys it.

use std::fmt;

use thiserror::Error;

use super::Scrubber;
use crate::identity::Identity;

/// Returned when a destroyed wrapper is accessed through `try_get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Secure identity has already been destroyed")]
pub struct WrapperDestroyed;

pub struct SecureIdentity {
    identity: Option<Identity>,
    scrubber: Scrubber,
}

impl SecureIdentity {
    /// Take ownership of `identity`. An absent identity yields a wrapper that
    /// starts out destroyed.
    pub fn new(identity: impl Into<Option<Identity>>) -> Self {
        Self::with_scrubber(identity, Scrubber::default())
    }

    pub fn with_scrubber(identity: impl Into<Option<Identity>>, scrubber: Scrubber) -> Self {
        Self {
            identity: identity.into(),
            scrubber,
        }
    }

    pub fn is_live(&self) -> bool {
        self.identity.is_some()
    }

    /// The owned identity, or `None` once destroyed.
    pub fn get(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Identity> {
        self.identity.as_mut()
    }

    pub fn try_get(&self) -> Result<&Identity, WrapperDestroyed> {
        self.get().ok_or(WrapperDestroyed)
    }

    /// Scrub and release the owned identity. Idempotent.
    pub fn destroy(&mut self) {
        if let Some(mut identity) = self.identity.take() {
            self.scrubber.clear_identity(&mut identity);
            tracing::debug!("Secure identity destroyed");
        }
    }
}

impl Drop for SecureIdentity {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for SecureIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureIdentity")
            .field("live", &self.is_live())
            .field("identity", &self.identity)
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
