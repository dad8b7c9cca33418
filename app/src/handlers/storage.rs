//! Storage lookups through whichever storage service the registry activated.

use actix_web::{get, web, HttpResponse, Responder};
use serde_json::json;

use actix_bootstrap_core::context::{ServiceRegistry, STORAGE_SERVICE};

/// Resolves an object name against the active storage service.
///
/// `404` when no storage service is active, `400` when the name is rejected.
#[get("/api/storage/{name:.*}")]
pub async fn resolve(registry: web::Data<ServiceRegistry>, name: web::Path<String>) -> impl Responder {
    let Some(storage) = registry.resolve(STORAGE_SERVICE) else {
        return HttpResponse::NotFound().json(json!({ "error": "storage service not configured" }));
    };

    let name = name.into_inner();
    match storage.resolve(&name) {
        Ok(path) => HttpResponse::Ok().json(json!({
            "name": name,
            "location": storage.location().display().to_string(),
            "path": path.display().to_string(),
        })),
        Err(e) => HttpResponse::BadRequest().json(json!({ "error": e.to_string() })),
    }
}
