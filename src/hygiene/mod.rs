// SQRL Store - Secrets Hygiene Module
//
// Best-effort scrubbing of secret-bearing memory: byte buffers, text, whole
// identities, and the `SecureIdentity` ownership wrapper.

mod wipe;
mod wrapper;

pub use wipe::{
    clear_identity, scramble_buffer, wipe_buffer, wipe_optional_text, wipe_text, FenceWipe,
    Scrubber, WipeStrategy, ZeroizeWipe,
};
pub use wrapper::{SecureIdentity, WrapperDestroyed};
