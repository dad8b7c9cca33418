//! Password encoding.
//!
//! # Spring Security Equivalent
//! `org.springframework.security.crypto.password.PasswordEncoder`
//!
//! # Feature Flags
//! - `http-basic`: Enables `Argon2PasswordEncoder`

#[cfg(feature = "http-basic")]
use argon2::password_hash::rand_core::OsRng;
#[cfg(feature = "http-basic")]
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
#[cfg(feature = "http-basic")]
use argon2::Argon2;
use derive_more::{Display, Error};

#[derive(Debug, Display, Error)]
#[display("failed to encode password: {message}")]
pub struct EncodingError {
    #[error(not(source))]
    message: String,
}

/// Encodes and verifies passwords stored as principal trust material.
///
/// # Example
/// ```ignore
/// use actix_bootstrap_core::http::security::crypto::{Argon2PasswordEncoder, PasswordEncoder};
///
/// let encoder = Argon2PasswordEncoder::new();
/// let hash = encoder.encode("my_password")?;
/// assert!(encoder.matches("my_password", &hash));
/// ```
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw_password: &str) -> Result<String, EncodingError>;

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool;
}

/// Stores passwords as-is. Only for tests and local demos.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPasswordEncoder;

impl PasswordEncoder for NoOpPasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, EncodingError> {
        Ok(raw_password.to_string())
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        raw_password == encoded_password
    }
}

/// Argon2 password encoder.
///
/// # Spring Security Equivalent
/// `Argon2PasswordEncoder`
#[cfg(feature = "http-basic")]
#[derive(Clone, Default)]
pub struct Argon2PasswordEncoder {
    argon2: Argon2<'static>,
}

#[cfg(feature = "http-basic")]
impl Argon2PasswordEncoder {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "http-basic")]
impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, EncodingError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(raw_password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| EncodingError {
                message: e.to_string(),
            })
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        match PasswordHash::new(encoded_password) {
            Ok(parsed_hash) => self
                .argon2
                .verify_password(raw_password.as_bytes(), &parsed_hash)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_encoder() {
        let encoder = NoOpPasswordEncoder;
        let encoded = encoder.encode("secret").unwrap();
        assert!(encoder.matches("secret", &encoded));
        assert!(!encoder.matches("other", &encoded));
    }

    #[cfg(feature = "http-basic")]
    #[test]
    fn test_argon2_encoder() {
        let encoder = Argon2PasswordEncoder::new();
        let encoded = encoder.encode("secret").unwrap();

        assert!(encoded.starts_with("$argon2"));
        assert!(encoder.matches("secret", &encoded));
        assert!(!encoder.matches("wrong", &encoded));
        assert!(!encoder.matches("secret", "not-a-hash"));
    }
}
