//! HTTP Basic authentication provider.
//!
//! # Spring Security Equivalent
//! `DaoAuthenticationProvider` behind `BasicAuthenticationFilter`
//!
//! # Feature Flag
//! Requires the `http-basic` feature (enabled by default).
//!
//! The credential is the part after `Basic `: `base64(identifier:password)`.
//! The principal's trust material is its encoded password.

use std::sync::Arc;

use async_trait::async_trait;
use base64::prelude::*;
use tracing::warn;

use crate::http::security::config::{AuthenticationOutcome, AuthenticationProvider, RejectReason};
use crate::http::security::crypto::{Argon2PasswordEncoder, PasswordEncoder};
use crate::http::security::lookup::PrincipalLookupService;

/// Decodes `base64(identifier:password)`.
pub fn decode_credential(credential: &str) -> Option<(String, String)> {
    let decoded = BASE64_STANDARD.decode(credential.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (identifier, password) = decoded.split_once(':')?;
    if identifier.is_empty() {
        return None;
    }
    Some((identifier.to_string(), password.to_string()))
}

/// Password-based [`AuthenticationProvider`].
///
/// # Example
/// ```rust,ignore
/// let encoder = Argon2PasswordEncoder::new();
/// let store = InMemoryPrincipalStore::new()
///     .with_principal(Principal::new("admin", encoder.encode("admin")?).roles(["ADMIN"]));
///
/// let provider = BasicAuthenticationProvider::new(store).password_encoder(encoder);
/// ```
pub struct BasicAuthenticationProvider {
    lookup: Arc<dyn PrincipalLookupService>,
    encoder: Arc<dyn PasswordEncoder>,
}

impl BasicAuthenticationProvider {
    /// Uses [`Argon2PasswordEncoder`] unless another encoder is configured.
    pub fn new(lookup: impl PrincipalLookupService + 'static) -> Self {
        BasicAuthenticationProvider {
            lookup: Arc::new(lookup),
            encoder: Arc::new(Argon2PasswordEncoder::new()),
        }
    }

    pub fn password_encoder(mut self, encoder: impl PasswordEncoder + 'static) -> Self {
        self.encoder = Arc::new(encoder);
        self
    }
}

#[async_trait]
impl AuthenticationProvider for BasicAuthenticationProvider {
    async fn authenticate(&self, credential: &str) -> AuthenticationOutcome {
        let Some((identifier, password)) = decode_credential(credential) else {
            return AuthenticationOutcome::Rejected(RejectReason::CredentialMalformed);
        };

        let principal = match self.lookup.lookup(&identifier).await {
            Ok(Some(principal)) => principal,
            Ok(None) => return AuthenticationOutcome::Rejected(RejectReason::PrincipalUnknown),
            Err(e) => {
                warn!(error = %e, "principal lookup failed");
                return AuthenticationOutcome::Rejected(RejectReason::LookupServiceUnavailable);
            }
        };

        let secret = principal.get_secret();
        if secret.is_empty() || !self.encoder.matches(&password, secret) {
            return AuthenticationOutcome::Rejected(RejectReason::CredentialInvalidOrExpired);
        }

        AuthenticationOutcome::Authenticated(principal.erase_credentials())
    }
}
