// SQRL Store - Identity model
//
// The caller-facing identity record defined by the SQRL protocol layer.
// SECURITY: `server_unlock` and `verify_unlock` are never included in Debug
// output. Use `SecureIdentity` when the returned secrets should be scrubbed
// automatically.

use std::fmt;

/// A persisted SQRL identity.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Identity {
    /// Identity key (IDK), the unique lookup identifier.
    pub key: String,
    /// Server unlock key material.
    pub server_unlock: String,
    /// Verify unlock key material.
    pub verify_unlock: String,
    /// Key of the identity this one replaced, if any.
    pub previous_key: Option<String>,
    /// Key of the identity that superseded this one, set once rekeyed.
    pub rekeyed: Option<String>,
    /// Only SQRL authentication is accepted for this account.
    pub sqrl_only: bool,
    /// Non-SQRL recovery paths are locked.
    pub hardlock: bool,
    /// The identity is disabled and may only be re-enabled with the unlock keys.
    pub disabled: bool,
    pub counter: i64,
}

impl Identity {
    /// Build an identity with the three required fields; everything else defaults.
    pub fn new(
        key: impl Into<String>,
        server_unlock: impl Into<String>,
        verify_unlock: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            server_unlock: server_unlock.into(),
            verify_unlock: verify_unlock.into(),
            ..Self::default()
        }
    }

    /// True when every field holds its zero value.
    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }
}

/// Custom Debug implementation that NEVER reveals the unlock keys.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("key", &self.key)
            .field("server_unlock", &"[REDACTED]")
            .field("verify_unlock", &"[REDACTED]")
            .field("previous_key", &self.previous_key)
            .field("rekeyed", &self.rekeyed)
            .field("sqrl_only", &self.sqrl_only)
            .field("hardlock", &self.hardlock)
            .field("disabled", &self.disabled)
            .field("counter", &self.counter)
            .finish()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
