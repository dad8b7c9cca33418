//! Signed bearer token authentication.
//!
//! # Spring Security Equivalent
//! `JwtAuthenticationProvider` backed by a `UserDetailsService`
//!
//! Tokens are HS256 JWTs signed with the *principal's own* secret. The
//! provider reads the subject without trusting it, loads the principal from
//! the trust store and only then verifies signature and expiry with that
//! principal's secret. Roles and authorities always come from the trust store.
//!
//! # Feature Flag
//! Requires the `token` feature (enabled by default).
//!
//! # Example
//! ```rust,ignore
//! use actix_bootstrap_core::http::security::token::{TokenAuthenticationProvider, TokenConfig, TokenIssuer};
//! use actix_bootstrap_core::http::security::{InMemoryPrincipalStore, Principal};
//!
//! let alice = Principal::new("alice", "alice-signing-secret").roles(["USER"]);
//! let store = InMemoryPrincipalStore::new().with_principal(alice.clone());
//!
//! let config = TokenConfig::new().issuer("demo").ttl_secs(900);
//! let token = TokenIssuer::new(config.clone()).issue(&alice)?;
//! let provider = TokenAuthenticationProvider::new(store).with_config(config);
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use derive_more::{Display, Error};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use jsonwebtoken::Algorithm;

use crate::http::security::config::{AuthenticationOutcome, AuthenticationProvider, RejectReason};
use crate::http::security::lookup::PrincipalLookupService;
use crate::http::security::principal::Principal;
use crate::http::security::properties::TokenProperties;

/// Registered claims carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal identifier
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    /// Claims for `subject`, valid for `ttl_secs` from now.
    pub fn new(subject: &str, ttl_secs: u64) -> Self {
        let now = jsonwebtoken::get_current_timestamp();
        Claims {
            sub: subject.to_string(),
            iss: None,
            exp: now + ttl_secs,
            iat: now,
        }
    }

    pub fn issuer(mut self, issuer: &str) -> Self {
        self.iss = Some(issuer.to_string());
        self
    }

    pub fn expires_at(mut self, exp: u64) -> Self {
        self.exp = exp;
        self
    }
}

/// Token settings shared by the issuer and the provider.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    algorithm: Algorithm,
    issuer: Option<String>,
    leeway_secs: u64,
    ttl_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        TokenConfig {
            algorithm: Algorithm::HS256,
            issuer: None,
            leeway_secs: 0,
            ttl_secs: 3600,
        }
    }
}

impl TokenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_properties(properties: &TokenProperties) -> Self {
        TokenConfig {
            issuer: properties.issuer.clone(),
            leeway_secs: properties.leeway_secs,
            ttl_secs: properties.ttl_secs,
            ..Self::default()
        }
    }

    /// Set the HMAC algorithm (HS256, HS384 or HS512).
    ///
    /// Tokens are keyed by shared secrets, so any other algorithm is ignored
    /// and the current one is kept.
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                self.algorithm = algorithm;
            }
            other => {
                warn!(algorithm = ?other, kept = ?self.algorithm, "non-HMAC token algorithm ignored");
            }
        }
        self
    }

    pub fn get_algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Issuer stamped on new tokens and required on incoming ones.
    pub fn issuer(mut self, issuer: &str) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    /// Clock skew tolerated when checking expiry.
    pub fn leeway_secs(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }

    pub fn ttl_secs(mut self, secs: u64) -> Self {
        self.ttl_secs = secs;
        self
    }

    pub fn get_ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    fn validation(&self, subject: &str) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway_secs;
        validation.validate_aud = false;
        validation.sub = Some(subject.to_string());
        if let Some(ref issuer) = self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }
}

/// Token minting errors.
#[derive(Debug, Display, Error)]
pub enum TokenError {
    #[display("failed to encode token: {source}")]
    Encoding { source: jsonwebtoken::errors::Error },
    #[display("principal '{_0}' has no signing secret")]
    MissingSecret(#[error(not(source))] String),
}

/// Mints tokens signed with each principal's own secret.
#[derive(Debug, Clone, Default)]
pub struct TokenIssuer {
    config: TokenConfig,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        TokenIssuer { config }
    }

    /// Issues a token for `principal` using the configured lifetime and issuer.
    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        let mut claims = Claims::new(principal.get_identifier(), self.config.ttl_secs);
        if let Some(ref issuer) = self.config.issuer {
            claims = claims.issuer(issuer);
        }
        self.issue_with_claims(principal, &claims)
    }

    /// Signs arbitrary claims with the principal's secret.
    pub fn issue_with_claims(
        &self,
        principal: &Principal,
        claims: &Claims,
    ) -> Result<String, TokenError> {
        if principal.get_secret().is_empty() {
            return Err(TokenError::MissingSecret(
                principal.get_identifier().to_string(),
            ));
        }

        let key = EncodingKey::from_secret(principal.get_secret().as_bytes());
        encode(&Header::new(self.config.algorithm), claims, &key)
            .map_err(|source| TokenError::Encoding { source })
    }
}

/// Default [`AuthenticationProvider`]: verifies bearer tokens.
pub struct TokenAuthenticationProvider {
    lookup: Arc<dyn PrincipalLookupService>,
    config: TokenConfig,
}

impl TokenAuthenticationProvider {
    pub fn new(lookup: impl PrincipalLookupService + 'static) -> Self {
        TokenAuthenticationProvider {
            lookup: Arc::new(lookup),
            config: TokenConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TokenConfig) -> Self {
        self.config = config;
        self
    }

    /// Reads the subject without checking the signature or expiry.
    fn peek_subject(&self, token: &str) -> Option<String> {
        jsonwebtoken::dangerous::insecure_decode::<Claims>(token)
            .ok()
            .map(|data| data.claims.sub)
            .filter(|sub| !sub.is_empty())
    }

    fn verify(&self, token: &str, principal: &Principal) -> bool {
        let key = DecodingKey::from_secret(principal.get_secret().as_bytes());
        let validation = self.config.validation(principal.get_identifier());

        match decode::<Claims>(token, &key, &validation) {
            Ok(_) => true,
            Err(e) => {
                debug!(identifier = %principal.get_identifier(), error = %e, "token verification failed");
                false
            }
        }
    }
}

#[async_trait]
impl AuthenticationProvider for TokenAuthenticationProvider {
    async fn authenticate(&self, credential: &str) -> AuthenticationOutcome {
        let Some(subject) = self.peek_subject(credential) else {
            return AuthenticationOutcome::Rejected(RejectReason::CredentialMalformed);
        };

        let principal = match self.lookup.lookup(&subject).await {
            Ok(Some(principal)) => principal,
            Ok(None) => return AuthenticationOutcome::Rejected(RejectReason::PrincipalUnknown),
            Err(e) => {
                warn!(error = %e, "principal lookup failed");
                return AuthenticationOutcome::Rejected(RejectReason::LookupServiceUnavailable);
            }
        };

        if principal.get_secret().is_empty() || !self.verify(credential, &principal) {
            return AuthenticationOutcome::Rejected(RejectReason::CredentialInvalidOrExpired);
        }

        AuthenticationOutcome::Authenticated(principal.erase_credentials())
    }
}
