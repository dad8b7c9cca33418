//! Common test utilities and configuration.
//!
//! This module provides shared test infrastructure including:
//! - Test configuration documents
//! - Test app builder wired like the real binary
//! - Credential helpers

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, App};
use base64::prelude::*;

use actix_bootstrap_app::security::{demo_principals, pipeline};
use actix_bootstrap_app::Application;
use actix_bootstrap_core::context::ConfigurationContext;
use actix_bootstrap_core::http::security::{
    Claims, PrincipalLookupService, SecurityProperties, SecurityTransform, TokenIssuer,
};

// =============================================================================
// Test Configuration
// =============================================================================

/// Storage enabled, public and properties paths open, everything else protected.
pub const TEST_CONFIG: &str = r#"
[storage.service]
enabled = true
location = "/srv/objects"

[mail]
host = "smtp.example.com"
port = 587
username = "mailer"
from = "noreply@example.com"

[user]
name = "Ada Lovelace"
age = 36
email = "ada@example.com"

[security]
permit-all = ["/public/**", "/api/properties/**"]
"#;

pub fn config(document: &str) -> ConfigurationContext {
    ConfigurationContext::builder()
        .toml(document)
        .build()
        .expect("valid test configuration")
}

pub fn application(document: &str) -> Application {
    Application::bootstrap(&config(document)).expect("application bootstraps")
}

pub fn security(application: &Application) -> SecurityProperties {
    application.properties.security.clone()
}

// =============================================================================
// Test Apps
// =============================================================================

/// Serves `application` behind `transform`.
pub async fn init_app(
    application: Application,
    transform: SecurityTransform,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(transform)
            .configure(move |cfg| application.configure(cfg)),
    )
    .await
}

/// The production wiring: demo principals, token provider, JSON failure handler.
pub async fn create_test_app(
    document: &str,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    let application = application(document);
    let pipeline = pipeline(demo_principals(), &security(&application));
    init_app(application, SecurityTransform::new(pipeline)).await
}

// =============================================================================
// Credentials
// =============================================================================

/// A valid token for a demo principal.
pub async fn token_for(identifier: &str) -> String {
    let principal = demo_principals()
        .lookup(identifier)
        .await
        .unwrap()
        .expect("demo principal");
    TokenIssuer::default().issue(&principal).unwrap()
}

/// A correctly signed token for a demo principal that expired an hour ago.
pub async fn expired_token_for(identifier: &str) -> String {
    let principal = demo_principals()
        .lookup(identifier)
        .await
        .unwrap()
        .expect("demo principal");
    let now = now_secs();
    let claims = Claims::new(identifier, 0).expires_at(now - 3600);
    TokenIssuer::default()
        .issue_with_claims(&principal, &claims)
        .unwrap()
}

pub fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Helper function to create Basic Auth header value.
pub fn basic_auth(identifier: &str, password: &str) -> String {
    let credentials = format!("{}:{}", identifier, password);
    format!("Basic {}", BASE64_STANDARD.encode(credentials))
}
