//! Read-only exposure of bound configuration groups.

use actix_web::{get, web, HttpResponse, Responder};

use crate::properties::{MailProperties, UserProperties};

#[get("/api/properties/mail")]
pub async fn mail(properties: web::Data<MailProperties>) -> impl Responder {
    HttpResponse::Ok().json(properties.get_ref())
}

#[get("/api/properties/user")]
pub async fn user(properties: web::Data<UserProperties>) -> impl Responder {
    HttpResponse::Ok().json(properties.get_ref())
}
