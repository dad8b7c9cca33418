//! Extractors for accessing the authenticated principal in handlers.
//!
//! # Spring Equivalent
//! `@AuthenticationPrincipal` annotation / `SecurityContextHolder`

use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::http::error::AuthError;
use crate::http::security::principal::Principal;

/// Extractor for the principal attached by [`SecurityTransform`](super::SecurityTransform).
///
/// # Usage
/// ```ignore
/// async fn me(principal: AuthenticatedPrincipal) -> impl Responder {
///     format!("Hello, {}!", principal.get_identifier())
/// }
/// ```
///
/// # Errors
/// Returns `401 Unauthorized` if no principal is attached, e.g. on a bypassed path.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(Principal);

impl AuthenticatedPrincipal {
    pub fn new(principal: Principal) -> Self {
        AuthenticatedPrincipal(principal)
    }

    pub fn into_inner(self) -> Principal {
        self.0
    }
}

impl Deref for AuthenticatedPrincipal {
    type Target = Principal;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedPrincipal {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Principal>().cloned() {
            Some(principal) => ready(Ok(AuthenticatedPrincipal(principal))),
            None => ready(Err(AuthError::Unauthorized)),
        }
    }
}

/// Like [`AuthenticatedPrincipal`] but yields `None` instead of failing.
#[derive(Debug, Clone)]
pub struct OptionalPrincipal(Option<Principal>);

impl OptionalPrincipal {
    pub fn into_inner(self) -> Option<Principal> {
        self.0
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl Deref for OptionalPrincipal {
    type Target = Option<Principal>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for OptionalPrincipal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalPrincipal(
            req.extensions().get::<Principal>().cloned(),
        )))
    }
}

/// Extension trait for HttpRequest to inspect the attached principal.
pub trait SecurityExt {
    fn get_principal(&self) -> Option<Principal>;

    fn is_authenticated(&self) -> bool;

    fn has_role(&self, role: &str) -> bool;

    fn has_authority(&self, authority: &str) -> bool;
}

impl SecurityExt for HttpRequest {
    fn get_principal(&self) -> Option<Principal> {
        self.extensions().get::<Principal>().cloned()
    }

    fn is_authenticated(&self) -> bool {
        self.extensions().get::<Principal>().is_some()
    }

    fn has_role(&self, role: &str) -> bool {
        self.extensions()
            .get::<Principal>()
            .is_some_and(|p| p.has_role(role))
    }

    fn has_authority(&self, authority: &str) -> bool {
        self.extensions()
            .get::<Principal>()
            .is_some_and(|p| p.has_authority(authority))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_extractors_read_request_extensions() {
        let req = TestRequest::default().to_http_request();
        assert!(AuthenticatedPrincipal::extract(&req).await.is_err());
        assert!(!OptionalPrincipal::extract(&req).await.unwrap().is_authenticated());

        req.extensions_mut()
            .insert(Principal::new("alice", "").roles(["USER"]));

        let principal = AuthenticatedPrincipal::extract(&req).await.unwrap();
        assert_eq!(principal.get_identifier(), "alice");
        assert!(req.has_role("USER"));
        assert!(!req.has_authority("users:write"));
    }
}
