// Inventory management over HTTP: public reads, admin-gated writes and
// direct stock reduction.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::StatusCode;
use actix_web::test;
use helpers::*;
use lavado::middleware::ADMIN_PASSWORD_HEADER;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_reads_are_public() {
    let app = init_app(demo_state()).await;

    let req = test::TestRequest::get().uri("/inventory").to_request();
    let items: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(items.as_array().unwrap().len(), 10);

    let req = test::TestRequest::get().uri("/inventory/barcode/0003").to_request();
    let wash: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wash["name"], "Lavado Premium");
    assert_eq!(wash["isService"], true);
    assert_eq!(wash["price"], "250.00");

    let req = test::TestRequest::get().uri("/inventory/barcode/9999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_writes_require_admin_password() {
    let app = init_app(memory_state()).await;

    let req = test::TestRequest::post()
        .uri("/inventory")
        .set_json(product_payload("Desengrasante", 8))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_error_body(&body, StatusCode::UNAUTHORIZED, "unauthorized");

    let req = test::TestRequest::post()
        .uri("/inventory")
        .insert_header((ADMIN_PASSWORD_HEADER, "incorrecta"))
        .set_json(product_payload("Desengrasante", 8))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/inventory").to_request();
    let items: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(items.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_product_lifecycle() {
    let app = init_app(memory_state()).await;

    let req = test::TestRequest::post()
        .uri("/inventory")
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .set_json(product_payload("Desengrasante", 8))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["quantity"], 8);
    assert_eq!(created["price"], "45.50");
    assert_eq!(created["active"], true);
    let uri = format!("/inventory/{}", created["id"]);

    // Password in the body works as well
    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "quantity": 12, "price": 50, "password": ADMIN_PASSWORD }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["quantity"], 12);
    assert_eq!(updated["price"], "50.00");
    assert_eq!(updated["name"], "Desengrasante");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri("/inventory").to_request();
    let items: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(items.as_array().unwrap().len(), 0);

    // Soft-deleted rows stay readable by id
    let req = test::TestRequest::get().uri(&uri).to_request();
    let item: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(item["active"], false);
}

#[actix_web::test]
async fn test_services_get_sequential_codes() {
    let app = init_app(demo_state()).await;

    let req = test::TestRequest::post()
        .uri("/inventory")
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .set_json(service_payload("Lavado de Motor", 300))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["barcode"], "0006");
    assert_eq!(created["quantity"], Value::Null);
}

#[actix_web::test]
async fn test_duplicate_barcode_is_rejected() {
    let app = init_app(demo_state()).await;

    let mut payload = product_payload("Ambientador", 10);
    payload["barcode"] = json!("0001");
    let req = test::TestRequest::post()
        .uri("/inventory")
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_reduce_stock() {
    let app = init_app(demo_state()).await;

    let req = test::TestRequest::post()
        .uri("/inventory/8/reduce-stock")
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .set_json(json!({ "quantity": 5 }))
        .to_request();
    let towels: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(towels["name"], "Toallas de Microfibra");
    assert_eq!(towels["quantity"], 45);

    let req = test::TestRequest::post()
        .uri("/inventory/7/reduce-stock")
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .set_json(json!({ "quantity": 4 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_error_body(&body, StatusCode::BAD_REQUEST, "insufficient_stock");

    let req = test::TestRequest::post()
        .uri("/inventory/7/reduce-stock")
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .set_json(json!({ "quantity": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/inventory/7").to_request();
    let wax: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wax["quantity"], 3);
}

#[actix_web::test]
async fn test_admin_validate_endpoint() {
    let app = init_app(memory_state()).await;

    let req = test::TestRequest::post()
        .uri("/admin/validate")
        .set_json(json!({ "password": ADMIN_PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["valid"], true);

    let req = test::TestRequest::post()
        .uri("/admin/validate")
        .set_json(json!({ "password": "otra" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["valid"], false);
}
