use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::{rngs::OsRng, RngCore};

use crate::error::NonceError;

/// Bytes of entropy per nonce.
pub const NONCE_BYTES: usize = 16;

/// Per-request CSP nonce: 16 OS-random bytes, standard base64 (24 chars,
/// alphabet `A-Za-z0-9+/=`), safe inside a header value and inside
/// `'nonce-…'`.
#[derive(Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Draws a new nonce from the operating system RNG.
    ///
    /// Fails instead of falling back to a weaker generator.
    pub fn generate() -> Result<Self, NonceError> {
        Self::generate_with(&mut OsRng)
    }

    /// Like [`Nonce::generate`] with a caller-supplied source.
    pub fn generate_with<R: RngCore>(rng: &mut R) -> Result<Self, NonceError> {
        let mut bytes = [0u8; NONCE_BYTES];
        rng.try_fill_bytes(&mut bytes)
            .map_err(NonceError::EntropyUnavailable)?;
        Ok(Self(STANDARD.encode(bytes)))
    }

    /// Accepts an externally supplied token.
    ///
    /// The token must be a non-empty CSP `base64-value`
    /// (`A-Za-z0-9+/-_`, up to two trailing `=`); anything else could break
    /// out of the `'nonce-…'` source expression.
    pub fn from_token(token: &str) -> Result<Self, NonceError> {
        let body = token.trim_end_matches('=');
        let padding = token.len() - body.len();
        let valid = !body.is_empty()
            && padding <= 2
            && body
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'-' | b'_'));
        if !valid {
            return Err(NonceError::Malformed(token.to_string()));
        }
        Ok(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The raw entropy behind the token.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.0)
    }

    /// `'nonce-<token>'`
    pub fn source_expression(&self) -> String {
        format!("'nonce-{}'", self.0)
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Keep nonces out of debug logs.
impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Nonce(..)")
    }
}

impl AsRef<str> for Nonce {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "entropy source offline",
            )))
        }
    }

    #[test]
    fn test_nonces_are_unique() {
        let tokens: HashSet<String> = (0..1000)
            .map(|_| Nonce::generate().unwrap().as_str().to_string())
            .collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_nonce_charset_and_entropy() {
        let header_safe = Regex::new(r"^[A-Za-z0-9+/]+={0,2}$").unwrap();
        for _ in 0..1000 {
            let nonce = Nonce::generate().unwrap();
            assert_eq!(nonce.as_str().len(), 24);
            assert!(header_safe.is_match(nonce.as_str()), "{}", nonce);
            assert_eq!(nonce.decode().unwrap().len(), NONCE_BYTES);
        }
    }

    #[test]
    fn test_entropy_failure_is_an_error() {
        let err = Nonce::generate_with(&mut BrokenRng).unwrap_err();
        assert!(matches!(err, NonceError::EntropyUnavailable(_)));
        assert_eq!(err.to_string(), "secure random source unavailable");
    }

    #[test]
    fn test_from_token_accepts_base64_values() {
        let fresh = Nonce::generate().unwrap();
        for token in ["abc123", "t", "AAAA+/==", "url-safe_token", fresh.as_str()] {
            assert_eq!(Nonce::from_token(token).unwrap().as_str(), token);
        }
    }

    #[test]
    fn test_from_token_rejects_breakout() {
        for token in ["", "=", "x'; script-src *", "a b", "abc;", "\"quoted\"", "abc===", "a=b"] {
            assert!(
                matches!(Nonce::from_token(token), Err(NonceError::Malformed(_))),
                "{:?} should be rejected",
                token
            );
        }
    }

    #[test]
    fn test_source_expression() {
        let nonce = Nonce("abc123".into());
        assert_eq!(nonce.source_expression(), "'nonce-abc123'");
        assert_eq!(format!("{:?}", nonce), "Nonce(..)");
    }
}
