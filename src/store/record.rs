// SQRL Store - Persisted record and conversion
//
// `PersistedRecord` mirrors `Identity` under storage column naming so the
// engine layout can change without touching the public contract. Records are
// built per call and scrubbed as soon as the call is done with them.

use std::fmt;

use crate::hygiene::Scrubber;
use crate::identity::Identity;

/// Storage-shape identity row.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PersistedRecord {
    pub idk: String,
    pub suk: String,
    pub vuk: String,
    pub pidk: Option<String>,
    pub rekeyed: Option<String>,
    pub sqrl_only: bool,
    pub hardlock: bool,
    pub disabled: bool,
    pub btn: i64,
}

impl PersistedRecord {
    /// Wipe every text column and zero the rest.
    pub(crate) fn scrub(&mut self, scrubber: &Scrubber) {
        scrubber.wipe_text(&mut self.idk);
        scrubber.wipe_text(&mut self.suk);
        scrubber.wipe_text(&mut self.vuk);
        scrubber.wipe_optional_text(&mut self.pidk);
        scrubber.wipe_optional_text(&mut self.rekeyed);
        self.sqrl_only = false;
        self.hardlock = false;
        self.disabled = false;
        self.btn = 0;
    }
}

impl fmt::Debug for PersistedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedRecord")
            .field("idk", &self.idk)
            .field("suk", &"[REDACTED]")
            .field("vuk", &"[REDACTED]")
            .field("pidk", &self.pidk)
            .field("rekeyed", &self.rekeyed)
            .field("sqrl_only", &self.sqrl_only)
            .field("hardlock", &self.hardlock)
            .field("disabled", &self.disabled)
            .field("btn", &self.btn)
            .finish()
    }
}

pub fn to_record(identity: &Identity) -> PersistedRecord {
    PersistedRecord {
        idk: identity.key.clone(),
        suk: identity.server_unlock.clone(),
        vuk: identity.verify_unlock.clone(),
        pidk: identity.previous_key.clone(),
        rekeyed: identity.rekeyed.clone(),
        sqrl_only: identity.sqrl_only,
        hardlock: identity.hardlock,
        disabled: identity.disabled,
        btn: identity.counter,
    }
}

pub fn to_identity(record: &PersistedRecord) -> Identity {
    Identity {
        key: record.idk.clone(),
        server_unlock: record.suk.clone(),
        verify_unlock: record.vuk.clone(),
        previous_key: record.pidk.clone(),
        rekeyed: record.rekeyed.clone(),
        sqrl_only: record.sqrl_only,
        hardlock: record.hardlock,
        disabled: record.disabled,
        counter: record.btn,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
