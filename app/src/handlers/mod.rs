//! Route handlers organized by access level.

use actix_web::web;

pub mod home;
pub mod properties;
pub mod public;
pub mod storage;

/// Registers every route of the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .service(public::hello)
        // Properties exposure (open in the default configuration)
        .service(properties::mail)
        .service(properties::user)
        // Authenticated routes
        .service(home::index)
        .service(home::me)
        .service(storage::resolve);
}
