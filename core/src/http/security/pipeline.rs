//! Per-request authentication control flow.
//!
//! # Spring Security Equivalent
//! The authentication part of `FilterChainProxy`: authorization rules decide
//! whether the request may skip authentication, the `AuthenticationManager`
//! verifies the credential and the `AuthenticationEntryPoint` answers denials.
//!
//! ```text
//! Unauthenticated ──Open──────────────────────▶ Bypassed
//!        │
//!   RequiresAuth ──provider ok───────────────▶ Authenticated(principal)
//!        │
//!        └───────no credential / rejected / panic──▶ Denied(reason)
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse};
use futures_util::FutureExt;
use tracing::{debug, error};

use crate::http::security::access_policy::{AccessPolicy, Requirement};
use crate::http::security::audit::{AuditLogger, SecurityEvent};
use crate::http::security::config::{
    AuthenticationOutcome, AuthenticationProvider, FailureHandler, RejectReason,
};
use crate::http::security::failure::JsonFailureHandler;
use crate::http::security::principal::Principal;

/// Terminal state of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    /// The path is open; the credential was never looked at.
    Bypassed,
    Authenticated(Principal),
    Denied(RejectReason),
}

/// Immutable after construction and shared by every worker.
///
/// # Example
/// ```rust,ignore
/// let pipeline = AuthenticationPipeline::new(TokenAuthenticationProvider::new(store))
///     .access_policy(AccessPolicy::from_properties(&security))
///     .failure_handler(JsonFailureHandler::new());
///
/// App::new().wrap(SecurityTransform::new(pipeline))
/// ```
#[derive(Clone)]
pub struct AuthenticationPipeline {
    policy: Arc<AccessPolicy>,
    provider: Arc<dyn AuthenticationProvider>,
    failure_handler: Arc<dyn FailureHandler>,
    audit: Option<AuditLogger>,
}

impl AuthenticationPipeline {
    /// A pipeline that requires authentication everywhere, answering denials
    /// with [`JsonFailureHandler`].
    pub fn new(provider: impl AuthenticationProvider + 'static) -> Self {
        AuthenticationPipeline {
            policy: Arc::new(AccessPolicy::default()),
            provider: Arc::new(provider),
            failure_handler: Arc::new(JsonFailureHandler::default()),
            audit: None,
        }
    }

    pub fn access_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn failure_handler(mut self, handler: impl FailureHandler + 'static) -> Self {
        self.failure_handler = Arc::new(handler);
        self
    }

    /// Records successful authentications. Denials are recorded by the
    /// failure handler.
    pub fn audit_logger(mut self, audit: AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Runs the state machine for one request.
    ///
    /// The access policy is consulted before the credential is touched, so a
    /// malformed credential on an open path is never an error. A panicking
    /// provider yields `Denied(ProviderFault)`.
    pub async fn evaluate(&self, path: &str, credential: Option<&str>) -> PipelineState {
        if self.policy.classify(path) == Requirement::Open {
            debug!(path, "open path, authentication bypassed");
            return PipelineState::Bypassed;
        }

        let credential = match credential {
            Some(credential) if !credential.trim().is_empty() => credential,
            _ => return PipelineState::Denied(RejectReason::CredentialMissing),
        };

        let outcome = AssertUnwindSafe(self.provider.authenticate(credential))
            .catch_unwind()
            .await;

        match outcome {
            Ok(AuthenticationOutcome::Authenticated(principal)) => {
                debug!(path, identifier = %principal.get_identifier(), "authenticated");
                if let Some(ref audit) = self.audit {
                    audit.log(SecurityEvent::authentication_success(
                        principal.get_identifier(),
                        path,
                    ));
                }
                PipelineState::Authenticated(principal)
            }
            Ok(AuthenticationOutcome::Rejected(reason)) => {
                debug!(path, %reason, "authentication rejected");
                PipelineState::Denied(reason)
            }
            Err(_) => {
                error!(path, "authentication provider panicked");
                PipelineState::Denied(RejectReason::ProviderFault)
            }
        }
    }

    /// Builds the response for a denied request.
    pub fn deny(&self, req: &HttpRequest, reason: RejectReason) -> HttpResponse {
        self.failure_handler.handle(req, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Accepts `good`, rejects everything else as malformed, counts calls.
    #[derive(Default)]
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl AuthenticationProvider for CountingProvider {
        async fn authenticate(&self, credential: &str) -> AuthenticationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match credential {
                "good" => AuthenticationOutcome::Authenticated(Principal::new("alice", "")),
                "boom" => panic!("provider exploded"),
                _ => AuthenticationOutcome::Rejected(RejectReason::CredentialMalformed),
            }
        }
    }

    fn pipeline(calls: Arc<AtomicUsize>) -> AuthenticationPipeline {
        AuthenticationPipeline::new(CountingProvider { calls }).access_policy(
            AccessPolicy::builder()
                .permit_all("/public/**")
                .authenticated("/**")
                .build(),
        )
    }

    #[actix_web::test]
    async fn test_open_path_never_calls_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline(calls.clone());

        assert_eq!(pipeline.evaluate("/public/doc", None).await, PipelineState::Bypassed);
        assert_eq!(
            pipeline.evaluate("/public/doc", Some("garbage")).await,
            PipelineState::Bypassed
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_missing_or_blank_credential() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline(calls.clone());

        for credential in [None, Some(""), Some("   ")] {
            assert_eq!(
                pipeline.evaluate("/private/data", credential).await,
                PipelineState::Denied(RejectReason::CredentialMissing)
            );
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_provider_outcomes() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline(calls.clone());

        match pipeline.evaluate("/private/data", Some("good")).await {
            PipelineState::Authenticated(p) => assert_eq!(p.get_identifier(), "alice"),
            other => panic!("unexpected state: {:?}", other),
        }
        assert_eq!(
            pipeline.evaluate("/private/data", Some("bad")).await,
            PipelineState::Denied(RejectReason::CredentialMalformed)
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[actix_web::test]
    async fn test_provider_panic_is_denied() {
        let pipeline = pipeline(Arc::new(AtomicUsize::new(0)));
        assert_eq!(
            pipeline.evaluate("/private/data", Some("boom")).await,
            PipelineState::Denied(RejectReason::ProviderFault)
        );
    }

    #[actix_web::test]
    async fn test_default_policy_requires_auth_everywhere() {
        let pipeline = AuthenticationPipeline::new(CountingProvider::default());
        assert_eq!(
            pipeline.evaluate("/public/doc", None).await,
            PipelineState::Denied(RejectReason::CredentialMissing)
        );
    }
}
