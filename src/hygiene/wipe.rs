// SQRL Store - Secret memory wiping
//
// Overwrites secret-bearing buffers so the writes survive optimization.
// The strategy is pluggable: `ZeroizeWipe` (volatile writes + compiler fence,
// via the `zeroize` crate) is the portable default, `FenceWipe` is a plain
// fill pinned by `black_box` and a fence.
//
// Text is wiped in place: a `String` owns a unique heap buffer, so the whole
// allocation, spare capacity included, is overwritten before the reference
// is reset to empty.

use std::fmt;
use std::hint::black_box;
use std::sync::atomic::{compiler_fence, Ordering};
use std::sync::Arc;

use rand::Rng;
use zeroize::Zeroize;

use crate::identity::Identity;

// ─── Strategies ──────────────────────────────────────────────────────────────

/// How a byte buffer is zeroed. Implementations must leave every byte at 0
/// and must not be removable as a dead store.
pub trait WipeStrategy: Send + Sync {
    fn wipe(&self, buf: &mut [u8]);

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Default strategy backed by `zeroize`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroizeWipe;

impl WipeStrategy for ZeroizeWipe {
    fn wipe(&self, buf: &mut [u8]) {
        buf.zeroize();
    }

    fn name(&self) -> &'static str {
        "zeroize"
    }
}

/// Plain fill followed by an optimization barrier.
#[derive(Debug, Clone, Copy, Default)]
pub struct FenceWipe;

impl WipeStrategy for FenceWipe {
    fn wipe(&self, buf: &mut [u8]) {
        buf.fill(0);
        let _ = black_box(&mut *buf);
        compiler_fence(Ordering::SeqCst);
    }

    fn name(&self) -> &'static str {
        "fence"
    }
}

// ─── Scrubber ────────────────────────────────────────────────────────────────

/// Applies a `WipeStrategy` to buffers, text, and identities.
#[derive(Clone)]
pub struct Scrubber {
    strategy: Arc<dyn WipeStrategy>,
}

impl Default for Scrubber {
    fn default() -> Self {
        Self::new(ZeroizeWipe)
    }
}

impl fmt::Debug for Scrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scrubber")
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl Scrubber {
    pub fn new(strategy: impl WipeStrategy + 'static) -> Self {
        Self {
            strategy: Arc::new(strategy),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Zero every byte of `buf`. Empty buffers are left alone.
    pub fn wipe_buffer(&self, buf: &mut [u8]) {
        if buf.is_empty() {
            return;
        }
        self.strategy.wipe(buf);
    }

    /// Overwrite the text's whole backing allocation, then leave `text` empty.
    pub fn wipe_text(&self, text: &mut String) {
        let mut bytes = std::mem::take(text).into_bytes();
        let capacity = bytes.capacity();
        if capacity == 0 {
            return;
        }
        bytes.resize(capacity, 0);
        self.wipe_buffer(&mut bytes);
    }

    /// Like `wipe_text`; the option is left as `None`.
    pub fn wipe_optional_text(&self, text: &mut Option<String>) {
        if let Some(mut inner) = text.take() {
            self.wipe_text(&mut inner);
        }
    }

    /// Wipe every text field of the identity and reset flags and counter.
    /// Does nothing when `identity` is `None`.
    pub fn clear_identity<'a>(&self, identity: impl Into<Option<&'a mut Identity>>) {
        let Some(identity) = identity.into() else {
            return;
        };

        self.wipe_text(&mut identity.key);
        self.wipe_text(&mut identity.server_unlock);
        self.wipe_text(&mut identity.verify_unlock);
        self.wipe_optional_text(&mut identity.previous_key);
        self.wipe_optional_text(&mut identity.rekeyed);
        identity.sqrl_only = false;
        identity.hardlock = false;
        identity.disabled = false;
        identity.counter = 0;
    }
}

// ─── Free functions (default strategy) ──────────────────────────────────────

pub fn wipe_buffer(buf: &mut [u8]) {
    ZeroizeWipe.wipe(buf);
}

/// Fill `buf` with non-zero bytes from the thread-local CSPRNG.
///
/// Every byte is drawn from `1..=255`, so the result never carries the
/// all-zero signature of a cleared secret. No cryptographic property beyond
/// "non-zero and not trivially predictable" is promised.
pub fn scramble_buffer(buf: &mut [u8]) {
    if buf.is_empty() {
        return;
    }
    let mut rng = rand::rng();
    for byte in buf.iter_mut() {
        *byte = rng.random_range(1..=u8::MAX);
    }
    let _ = black_box(&mut *buf);
    compiler_fence(Ordering::SeqCst);
}

pub fn wipe_text(text: &mut String) {
    Scrubber::default().wipe_text(text);
}

pub fn wipe_optional_text(text: &mut Option<String>) {
    Scrubber::default().wipe_optional_text(text);
}

pub fn clear_identity<'a>(identity: impl Into<Option<&'a mut Identity>>) {
    Scrubber::default().clear_identity(identity);
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn populated_identity() -> Identity {
        Identity {
            key: "abc123".to_string(),
            server_unlock: "suk-secret".to_string(),
            verify_unlock: "vuk-secret".to_string(),
            previous_key: Some("old-key".to_string()),
            rekeyed: Some("new-key".to_string()),
            sqrl_only: true,
            hardlock: true,
            disabled: true,
            counter: 42,
        }
    }

    #[test]
    fn test_wipe_buffer_zeroes_every_byte() {
        let mut buf = vec![0xAAu8; 64];
        wipe_buffer(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_wipe_buffer_empty_is_noop() {
        let mut buf: Vec<u8> = Vec::new();
        wipe_buffer(&mut buf);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_fence_strategy_zeroes_every_byte() {
        let scrubber = Scrubber::new(FenceWipe);
        let mut buf = *b"verify-unlock-key-material";
        scrubber.wipe_buffer(&mut buf);
        assert!(buf.iter().all(|&b| b == 0));
        assert_eq!(scrubber.strategy_name(), "fence");
    }

    #[test]
    fn test_scramble_buffer_is_non_zero() {
        let mut buf = vec![0u8; 4096];
        scramble_buffer(&mut buf);
        assert!(buf.iter().all(|&b| b != 0), "Scrambled bytes must never be zero");

        // 4096 bytes from a CSPRNG will not all be the same value
        let first = buf[0];
        assert!(buf.iter().any(|&b| b != first));
    }

    #[test]
    fn test_wipe_text_clears_reference() {
        let mut text = String::with_capacity(128);
        text.push_str("suk-secret-material");
        wipe_text(&mut text);
        assert!(text.is_empty());
    }

    #[test]
    fn test_wipe_optional_text_leaves_none() {
        let mut text = Some("pidk".to_string());
        wipe_optional_text(&mut text);
        assert_eq!(text, None);

        let mut absent: Option<String> = None;
        wipe_optional_text(&mut absent);
        assert_eq!(absent, None);
    }

    #[test]
    fn test_clear_identity_resets_all_fields() {
        let mut identity = populated_identity();
        clear_identity(&mut identity);

        assert!(identity.key.is_empty());
        assert!(identity.server_unlock.is_empty());
        assert!(identity.verify_unlock.is_empty());
        assert!(identity.previous_key.is_none());
        assert!(identity.rekeyed.is_none());
        assert!(!identity.sqrl_only);
        assert!(!identity.hardlock);
        assert!(!identity.disabled);
        assert_eq!(identity.counter, 0);
        assert!(identity.is_cleared());
    }

    #[test]
    fn test_clear_identity_absent_is_noop() {
        clear_identity(None);
    }

    #[test]
    fn test_scrubber_debug_names_strategy() {
        let debug_output = format!("{:?}", Scrubber::default());
        assert!(debug_output.contains("zeroize"));
    }
}
