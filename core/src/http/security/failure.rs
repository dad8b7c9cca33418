//! Default failure handler.
//!
//! # Spring Security Equivalent
//! A custom `AuthenticationEntryPoint` writing a JSON error body

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};

use crate::http::error::UnauthorizedBody;
use crate::http::security::audit::{AuditLogger, SecurityEvent};
use crate::http::security::config::{FailureHandler, RejectReason};

/// Answers every denial with the same `401` JSON body.
///
/// The reason only reaches the audit log. Denials are recorded at `WARNING`
/// severity and operational faults at `ERROR`.
///
/// ```json
/// {
///   "status": 401,
///   "error": "Unauthorized",
///   "message": "Full authentication is required to access this resource",
///   "path": "/private/me"
/// }
/// ```
#[derive(Clone)]
pub struct JsonFailureHandler {
    challenge: String,
    audit: AuditLogger,
}

impl Default for JsonFailureHandler {
    fn default() -> Self {
        JsonFailureHandler {
            challenge: "Bearer".to_string(),
            audit: AuditLogger::default(),
        }
    }
}

impl JsonFailureHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the `WWW-Authenticate` header (default: `Bearer`).
    pub fn challenge(mut self, challenge: &str) -> Self {
        self.challenge = challenge.to_string();
        self
    }

    pub fn audit_logger(mut self, audit: AuditLogger) -> Self {
        self.audit = audit;
        self
    }
}

impl FailureHandler for JsonFailureHandler {
    fn handle(&self, req: &HttpRequest, reason: RejectReason) -> HttpResponse {
        let path = req.path();

        let mut event = SecurityEvent::denied(reason, path).method(req.method().as_str());
        if let Some(ip) = req.connection_info().realip_remote_addr() {
            event = event.ip_address(ip);
        }
        self.audit.log(event);

        HttpResponse::Unauthorized()
            .insert_header((header::WWW_AUTHENTICATE, self.challenge.as_str()))
            .json(UnauthorizedBody::new(Some(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::security::audit::{InMemoryEventStore, SecurityEventType};
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_body_is_identical_for_every_reason() {
        let handler = JsonFailureHandler::new().audit_logger(AuditLogger::new());
        let req = TestRequest::get().uri("/private/me").to_http_request();

        let mut bodies = Vec::new();
        for reason in [
            RejectReason::CredentialMissing,
            RejectReason::PrincipalUnknown,
            RejectReason::CredentialInvalidOrExpired,
            RejectReason::ProviderFault,
        ] {
            let res = handler.handle(&req, reason);
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(
                res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
                "Bearer"
            );
            bodies.push(to_bytes(res.into_body()).await.unwrap());
        }

        assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
        let json: serde_json::Value = serde_json::from_slice(&bodies[0]).unwrap();
        assert_eq!(json["status"], 401);
        assert_eq!(json["path"], "/private/me");
    }

    #[actix_web::test]
    async fn test_reason_goes_to_audit_log() {
        let store = InMemoryEventStore::new();
        let handler = JsonFailureHandler::new()
            .challenge("Basic realm=\"demo\"")
            .audit_logger(AuditLogger::new().add_handler(store.clone()));
        let req = TestRequest::post().uri("/private/x").to_http_request();

        let res = handler.handle(&req, RejectReason::LookupServiceUnavailable);
        assert_eq!(
            res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"demo\""
        );

        let events = store.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, SecurityEventType::OperationalFault);
        assert_eq!(events[0].reason, Some("lookup_service_unavailable"));
        assert_eq!(events[0].method.as_deref(), Some("POST"));
        assert_eq!(events[0].path.as_deref(), Some("/private/x"));
    }
}
