//! PKCE (RFC 7636) challenge/verifier generation and state tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// A per-login verifier and its derived S256 challenge. The verifier stays
/// server-side until token exchange; only the challenge leaves in the
/// authorization URL.
#[derive(Debug)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

/// Generate a fresh PKCE pair: 32 random bytes as the verifier (URL-safe
/// base64, no padding) and the S256 challenge over its encoded form.
pub fn generate() -> PkcePair {
    let verifier_bytes: [u8; 32] = rand::thread_rng().gen();
    let verifier = URL_SAFE_NO_PAD.encode(verifier_bytes);
    let challenge = challenge_of(&verifier);
    PkcePair {
        verifier,
        challenge,
    }
}

/// `challenge = BASE64URL(SHA256(verifier))`
pub fn challenge_of(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Generate an opaque CSRF state token: 16 random bytes, hex encoded.
pub fn generate_state() -> String {
    let state_bytes: [u8; 16] = rand::thread_rng().gen();
    hex::encode(state_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_url_safe(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    #[test]
    fn verifier_is_43_chars_of_url_safe_base64() {
        let pair = generate();
        // 32 bytes → 43 base64url chars, no padding
        assert_eq!(pair.verifier.len(), 43);
        assert!(is_url_safe(&pair.verifier));
    }

    #[test]
    fn challenge_is_sha256_of_encoded_verifier() {
        let pair = generate();
        assert_eq!(pair.challenge, challenge_of(&pair.verifier));
        assert_eq!(pair.challenge.len(), 43);
        assert!(is_url_safe(&pair.challenge));
    }

    #[test]
    fn challenge_matches_known_value() {
        // SHA256("hello") = 2cf24dba...9824, base64url of those 32 bytes:
        assert_eq!(
            challenge_of("hello"),
            "LPJNul-wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ"
        );
    }

    #[test]
    fn verifiers_never_collide() {
        let a = generate();
        let b = generate();
        assert_ne!(a.verifier, b.verifier);
    }

    #[test]
    fn state_is_16_bytes_hex() {
        let state = generate_state();
        assert_eq!(state.len(), 32);
        assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
