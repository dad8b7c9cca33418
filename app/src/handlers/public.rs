//! Public routes (no authentication required).

use actix_web::{get, web, HttpResponse, Responder};

#[get("/public/{tail:.*}")]
pub async fn hello(tail: web::Path<String>) -> impl Responder {
    HttpResponse::Ok().body(format!("Public resource: /{}", tail.into_inner()))
}
