//! # Drim Secret Generator
//!
//! File: cli/src/core/secrets.rs
//!
//! ## Overview
//!
//! Produces the credentials embedded in generated artifacts (auth/JWT secret,
//! Postgres password). Output is drawn from the operating system's CSPRNG,
//! encoded with the URL-safe base64 alphabet without padding and truncated to
//! the requested length, so every character is one of `[A-Za-z0-9_-]`. That
//! alphabet needs no escaping inside YAML double-quoted values, `KEY=value`
//! lines or a `postgresql://` URL.
//!
//! Generation fails closed: if the random source is unavailable the caller
//! gets `SecretError::RandomSourceUnavailable` and must abort the whole
//! generation pass. There is no placeholder fallback value.
//!
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use rand::TryRngCore;
use thiserror::Error;
use tracing::debug;

/// Length of generated Postgres passwords.
pub const PASSWORD_LENGTH: usize = 32;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("random source unavailable: {0}")]
    RandomSourceUnavailable(String),
}

/// Source of credential strings.
///
/// The builder only ever talks to this trait, which lets tests observe
/// whether generation happened at all.
pub trait SecretGenerator {
    /// Returns a string of exactly `length` characters from `[A-Za-z0-9_-]`.
    fn generate(&self, length: usize) -> Result<String, SecretError>;
}

/// Secret generator backed by `rand::rngs::OsRng`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSecretGenerator;

impl SecretGenerator for OsSecretGenerator {
    fn generate(&self, length: usize) -> Result<String, SecretError> {
        encode_secret(length, |buf| {
            let mut rng = OsRng;
            rng.try_fill_bytes(buf)
                .map_err(|e| SecretError::RandomSourceUnavailable(e.to_string()))
        })
    }
}

/// Fills `length` random bytes through `fill`, encodes them and truncates.
///
/// Base64 yields four characters per three bytes, so `length` bytes always
/// encode to at least `length` characters.
pub fn encode_secret<F>(length: usize, fill: F) -> Result<String, SecretError>
where
    F: FnOnce(&mut [u8]) -> Result<(), SecretError>,
{
    let mut bytes = vec![0u8; length];
    fill(&mut bytes)?;
    let mut encoded = URL_SAFE_NO_PAD.encode(&bytes);
    encoded.truncate(length);
    debug!("Generated secret of length {}", encoded.len());
    Ok(encoded)
}

/// True for characters of the generator's output alphabet.
pub fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// True when `value` is non-empty and only uses the safe alphabet.
pub fn is_safe_secret(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_safe_char)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_exact_lengths() {
        let generator = OsSecretGenerator;
        for length in [0usize, 1, 2, 3, 4, 5, 16, 31, 32, 33, 63, 64, 100] {
            let secret = generator.generate(length).unwrap();
            assert_eq!(secret.chars().count(), length, "length {}", length);
            assert!(secret.chars().all(is_safe_char), "unsafe char in {}", secret);
        }
    }

    #[test]
    fn test_generated_secrets_differ() {
        let generator = OsSecretGenerator;
        let a = generator.generate(32).unwrap();
        let b = generator.generate(32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_alphabet_excludes_escape_characters() {
        // Deterministic bytes covering the whole 0..=255 range.
        let secret = encode_secret(256, |buf| {
            for (i, byte) in buf.iter_mut().enumerate() {
                *byte = i as u8;
            }
            Ok(())
        })
        .unwrap();
        for forbidden in ['"', '\n', '=', '#', '+', '/', ' '] {
            assert!(!secret.contains(forbidden), "found {:?}", forbidden);
        }
    }

    /// The random source failing must surface as an error. Earlier releases
    /// substituted a fixed placeholder password here; that must not return.
    #[test]
    fn test_rng_failure_fails_closed() {
        let result = encode_secret(32, |_| {
            Err(SecretError::RandomSourceUnavailable("no entropy".into()))
        });
        assert_eq!(
            result,
            Err(SecretError::RandomSourceUnavailable("no entropy".into()))
        );
    }

    #[test]
    fn test_is_safe_secret() {
        assert!(is_safe_secret("abc-DEF_123"));
        assert!(!is_safe_secret(""));
        assert!(!is_safe_secret("has space"));
        assert!(!is_safe_secret("quote\"d"));
        assert!(!is_safe_secret("key=value"));
        assert!(!is_safe_secret("hash#tag"));
    }
}
