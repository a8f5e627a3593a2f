//! Short, non-secret identifier for the active session key.
//!
//! Logged at startup so operators can tell which key a node loaded without
//! the key material ever reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// Lowercase hex of the first eight bytes of SHA-256 over the signing key.
///
/// ```rust
/// use actix_web::cookie::Key;
/// use backend::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::generate());
/// assert_eq!(fingerprint.len(), 16);
/// ```
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.iter().take(FINGERPRINT_BYTES).copied().collect::<Vec<u8>>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn same_material_gives_same_fingerprint() {
        let first = Key::derive_from(&[7_u8; 64]);
        let second = Key::derive_from(&[7_u8; 64]);
        assert_eq!(key_fingerprint(&first), key_fingerprint(&second));
    }

    #[rstest]
    #[case(b'a', b'b')]
    #[case(0, 255)]
    fn distinct_material_gives_distinct_fingerprints(#[case] left: u8, #[case] right: u8) {
        let left_key = Key::derive_from(&[left; 64]);
        let right_key = Key::derive_from(&[right; 64]);
        assert_ne!(key_fingerprint(&left_key), key_fingerprint(&right_key));
    }

    #[rstest]
    fn fingerprint_is_sixteen_lowercase_hex_digits() {
        let fingerprint = key_fingerprint(&Key::generate());
        assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
        assert!(
            fingerprint
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }
}
