// SQRL Store - Identity key validation
//
// Runs before every keyed store operation. Bounds request size and rejects
// anything outside the base64/URL-safe alphabet, which keeps control
// characters and SQL-shaped payloads away from the engine.

use super::ValidationError;

/// Maximum identity key length in bytes.
pub const MAX_KEY_LEN: usize = 256;

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | '-' | '_' | '.')
}

/// Check that `key` is a well-formed identity key.
pub fn validate_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey);
    }

    if key.len() > MAX_KEY_LEN {
        return Err(ValidationError::KeyTooLong {
            len: key.len(),
            max: MAX_KEY_LEN,
        });
    }

    match key.char_indices().find(|&(_, c)| !is_key_char(c)) {
        Some((position, _)) => Err(ValidationError::InvalidFormat { position }),
        None => Ok(()),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_rejected() {
        assert_eq!(validate_key(""), Err(ValidationError::EmptyKey));
    }

    #[test]
    fn test_length_boundaries() {
        assert_eq!(validate_key("a"), Ok(()));
        assert_eq!(validate_key(&"a".repeat(MAX_KEY_LEN)), Ok(()));
        assert_eq!(
            validate_key(&"a".repeat(MAX_KEY_LEN + 1)),
            Err(ValidationError::KeyTooLong { len: 257, max: 256 })
        );
    }

    #[test]
    fn test_full_alphabet_accepted() {
        let key = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=-_.";
        assert_eq!(validate_key(key), Ok(()));
    }

    #[test]
    fn test_base64_identity_keys_accepted() {
        for key in ["abc123", "dGVzdC1pZGs=", "Xv4_ZPb-mE3w.key", "a/b+c=="] {
            assert_eq!(validate_key(key), Ok(()), "{key} should be valid");
        }
    }

    #[test]
    fn test_disallowed_characters_rejected() {
        let bad = [
            "abc 123",
            "abc'; DROP TABLE sqrl_identities; --",
            "abc\0def",
            "abc\ndef",
            "key\\path",
            "key?",
            "key@host",
            "[key]",
            "ключ",
            "emoji🔑",
            "a*b",
            "%41",
        ];
        for key in bad {
            assert!(
                matches!(validate_key(key), Err(ValidationError::InvalidFormat { .. })),
                "{key:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_format_reports_first_offset() {
        assert_eq!(
            validate_key("abc def!"),
            Err(ValidationError::InvalidFormat { position: 3 })
        );
    }

    #[test]
    fn test_single_bad_character_anywhere_fails() {
        let base = "a".repeat(100);
        for position in [0, 50, 99] {
            let mut key = base.clone();
            key.replace_range(position..position + 1, "#");
            assert_eq!(
                validate_key(&key),
                Err(ValidationError::InvalidFormat { position })
            );
        }
    }

    #[test]
    fn test_length_checked_before_charset() {
        // Too long and malformed: length wins
        let key = "#".repeat(MAX_KEY_LEN + 1);
        assert!(matches!(
            validate_key(&key),
            Err(ValidationError::KeyTooLong { .. })
        ));
    }
}
