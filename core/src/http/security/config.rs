//! Core traits of the authentication pipeline.
//!
//! # Spring Equivalent
//! `AuthenticationProvider` and `AuthenticationEntryPoint` interfaces

use actix_web::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use derive_more::Display;

use crate::http::security::principal::Principal;

/// Why a request that required authentication was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum RejectReason {
    #[display("credential missing")]
    CredentialMissing,
    #[display("credential malformed")]
    CredentialMalformed,
    #[display("principal unknown")]
    PrincipalUnknown,
    #[display("credential invalid or expired")]
    CredentialInvalidOrExpired,
    #[display("lookup service unavailable")]
    LookupServiceUnavailable,
    #[display("authentication provider fault")]
    ProviderFault,
}

impl RejectReason {
    /// Stable machine-readable code, used in audit events.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::CredentialMissing => "credential_missing",
            RejectReason::CredentialMalformed => "credential_malformed",
            RejectReason::PrincipalUnknown => "principal_unknown",
            RejectReason::CredentialInvalidOrExpired => "credential_invalid_or_expired",
            RejectReason::LookupServiceUnavailable => "lookup_service_unavailable",
            RejectReason::ProviderFault => "provider_fault",
        }
    }

    /// True when the denial comes from infrastructure failing rather than
    /// from the credential itself. Such denials are still fail-closed.
    pub fn is_operational_fault(&self) -> bool {
        matches!(
            self,
            RejectReason::LookupServiceUnavailable | RejectReason::ProviderFault
        )
    }
}

/// Result of verifying one credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationOutcome {
    Authenticated(Principal),
    Rejected(RejectReason),
}

impl AuthenticationOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthenticationOutcome::Authenticated(_))
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthenticationOutcome::Authenticated(principal) => Some(principal),
            AuthenticationOutcome::Rejected(_) => None,
        }
    }
}

/// Verifies a credential and produces a principal or a rejection.
///
/// # Spring Equivalent
/// `AuthenticationProvider.authenticate(Authentication)`
///
/// The pipeline only depends on this contract, so token, password or
/// certificate based providers are interchangeable.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    async fn authenticate(&self, credential: &str) -> AuthenticationOutcome;
}

/// Produces the response for a denied request.
///
/// # Spring Equivalent
/// `AuthenticationEntryPoint.commence(...)`
///
/// Implementations must always return a complete response.
pub trait FailureHandler: Send + Sync {
    fn handle(&self, req: &HttpRequest, reason: RejectReason) -> HttpResponse;
}
