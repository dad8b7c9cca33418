//! Properties exposure endpoint tests.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{create_test_app, TEST_CONFIG};

#[actix_web::test]
async fn test_mail_properties_are_exposed() {
    let app = create_test_app(TEST_CONFIG).await;

    let req = test::TestRequest::get()
        .uri("/api/properties/mail")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        serde_json::json!({
            "host": "smtp.example.com",
            "port": 587,
            "username": "mailer",
            "from": "noreply@example.com"
        })
    );
}

#[actix_web::test]
async fn test_user_properties_are_exposed() {
    let app = create_test_app(TEST_CONFIG).await;

    let req = test::TestRequest::get()
        .uri("/api/properties/user")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Ada Lovelace");
    assert_eq!(body["age"], 36);
    assert_eq!(body["email"], "ada@example.com");
}

#[actix_web::test]
async fn test_missing_group_is_exposed_with_defaults() {
    let app = create_test_app("[security]\npermit-all = [\"/api/properties/**\"]").await;

    let req = test::TestRequest::get()
        .uri("/api/properties/user")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "");
    assert_eq!(body["age"], 0);
}

#[actix_web::test]
async fn test_properties_are_protected_when_not_permitted() {
    let app = create_test_app("[mail]\nhost = \"smtp.example.com\"").await;

    let req = test::TestRequest::get()
        .uri("/api/properties/mail")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
