//! Security middleware for Actix Web.
//!
//! # Spring Equivalent
//! `SecurityFilterChain` / `FilterChainProxy`

use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderName};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::security::pipeline::{AuthenticationPipeline, PipelineState};

/// Pulls the raw credential out of a request.
///
/// # Spring Equivalent
/// `BearerTokenResolver` / `AuthenticationConverter`
pub trait CredentialExtractor: Send + Sync {
    /// `None` when the request carries no credential at all.
    fn extract(&self, req: &ServiceRequest) -> Option<String>;
}

/// Reads a credential from a header, stripping the scheme prefix.
///
/// A header whose value does not start with the scheme is handed to the
/// provider unchanged, which rejects it as malformed.
#[derive(Debug, Clone)]
pub struct HeaderCredentialExtractor {
    header: HeaderName,
    prefix: String,
}

impl HeaderCredentialExtractor {
    pub fn new(header: HeaderName, scheme: &str) -> Self {
        HeaderCredentialExtractor {
            header,
            prefix: format!("{} ", scheme),
        }
    }

    /// `Authorization: Bearer <token>`
    pub fn bearer() -> Self {
        Self::new(header::AUTHORIZATION, "Bearer")
    }

    /// `Authorization: Basic <base64(identifier:password)>`
    pub fn basic() -> Self {
        Self::new(header::AUTHORIZATION, "Basic")
    }
}

impl Default for HeaderCredentialExtractor {
    fn default() -> Self {
        Self::bearer()
    }
}

impl CredentialExtractor for HeaderCredentialExtractor {
    fn extract(&self, req: &ServiceRequest) -> Option<String> {
        let value = req.headers().get(&self.header)?;
        let value = String::from_utf8_lossy(value.as_bytes());

        let has_scheme = value
            .get(..self.prefix.len())
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case(&self.prefix));
        if has_scheme {
            Some(value[self.prefix.len()..].trim().to_string())
        } else {
            Some(value.into_owned())
        }
    }
}

/// Security middleware factory.
///
/// # Spring Equivalent
/// `SecurityFilterChain`
///
/// # Example
/// ```ignore
/// App::new().wrap(
///     SecurityTransform::new(pipeline)
///         .credential_extractor(HeaderCredentialExtractor::basic())
/// )
/// ```
pub struct SecurityTransform {
    pipeline: AuthenticationPipeline,
    extractor: Arc<dyn CredentialExtractor>,
}

impl SecurityTransform {
    /// Uses the `Authorization: Bearer` extractor.
    pub fn new(pipeline: AuthenticationPipeline) -> Self {
        SecurityTransform {
            pipeline,
            extractor: Arc::new(HeaderCredentialExtractor::bearer()),
        }
    }

    pub fn credential_extractor(mut self, extractor: impl CredentialExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityTransform
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecurityService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityService {
            pipeline: self.pipeline.clone(),
            extractor: Arc::clone(&self.extractor),
            service: Rc::new(service),
        })
    }
}

/// Security middleware service.
///
/// # Spring Equivalent
/// `FilterChainProxy`
pub struct SecurityService<S> {
    pipeline: AuthenticationPipeline,
    extractor: Arc<dyn CredentialExtractor>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SecurityService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let pipeline = self.pipeline.clone();
        let credential = self.extractor.extract(&req);
        let path = req.path().to_string();

        Box::pin(async move {
            match pipeline.evaluate(&path, credential.as_deref()).await {
                PipelineState::Bypassed => {}
                PipelineState::Authenticated(principal) => {
                    // Available to handlers via AuthenticatedPrincipal
                    req.extensions_mut().insert(principal);
                }
                PipelineState::Denied(reason) => {
                    let response = pipeline.deny(req.request(), reason);
                    return Ok(req.into_response(response).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
