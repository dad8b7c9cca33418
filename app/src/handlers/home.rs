//! Routes behind the authentication pipeline.

use actix_web::{get, HttpResponse, Responder};

use actix_bootstrap_core::http::security::{AuthenticatedPrincipal, OptionalPrincipal};

/// Greets the caller. Reached only when `/` is authenticated or opened by policy.
#[get("/")]
pub async fn index(principal: OptionalPrincipal) -> impl Responder {
    match principal.into_inner() {
        Some(p) => HttpResponse::Ok().body(format!("Welcome, {}!", p.get_identifier())),
        None => HttpResponse::Ok().body("Welcome, guest!"),
    }
}

/// The attached principal as JSON. Its trust material is never serialized.
#[get("/private/me")]
pub async fn me(principal: AuthenticatedPrincipal) -> impl Responder {
    HttpResponse::Ok().json(principal.into_inner())
}
