// End-to-end tests against a real listening server, with the same middleware
// stack `main` installs.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_cors::Cors;
use actix_test::TestServer;
use actix_web::http::StatusCode;
use actix_web::{middleware::from_fn, App};
use helpers::*;
use lavado::middleware::{request_id, ADMIN_PASSWORD_HEADER};
use lavado::AppState;
use serde_json::{json, Value};
use tracing_actix_web::TracingLogger;

fn spawn_server(state: AppState) -> TestServer {
    actix_test::start(move || {
        let state = state.clone();
        App::new()
            .wrap(Cors::permissive())
            .wrap(from_fn(request_id))
            .wrap(TracingLogger::default())
            .configure(move |cfg| state.configure(cfg))
    })
}

#[actix_web::test]
async fn test_health_and_readiness() {
    let srv = spawn_server(memory_state());

    let mut resp = srv.get("/health").send().await.unwrap();
    assert_status(&resp, StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let mut resp = srv.get("/ready").send().await.unwrap();
    assert_status(&resp, StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ready"], true);
    assert_eq!(body["checks"]["database"], "not_configured");
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let srv = spawn_server(memory_state());

    let resp = srv
        .get("/health")
        .insert_header(("x-request-id", "caja-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "caja-1"
    );

    let resp = srv.get("/health").send().await.unwrap();
    assert!(resp.headers().contains_key("x-request-id"));
}

#[actix_web::test]
async fn test_checkout_over_the_wire() {
    let srv = spawn_server(demo_state());

    let mut resp = srv
        .post("/invoices")
        .send_json(&invoice_with_stock(&[(6, 1), (8, 2)]))
        .await
        .unwrap();
    assert_status(&resp, StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["invoice"]["number"], "001-0001");
    assert_eq!(body["invoice"]["total"], "80.00");

    let mut resp = srv.get("/inventory/8").send().await.unwrap();
    let towels: Value = resp.json().await.unwrap();
    assert_eq!(towels["quantity"], 48);

    let mut resp = srv
        .post("/invoices")
        .send_json(&invoice_with_stock(&[(7, 10)]))
        .await
        .unwrap();
    assert_status(&resp, StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_error_body(&body, StatusCode::BAD_REQUEST, "insufficient_stock");
}

#[actix_web::test]
async fn test_concurrent_checkouts_never_oversell() {
    let srv = spawn_server(demo_state());

    // Cera Automotriz (7) has 3 units; six clients each try to buy one
    let requests = (0..6).map(|_| {
        srv.post("/invoices")
            .send_json(&invoice_with_stock(&[(7, 1)]))
    });
    let responses = futures_util::future::join_all(requests).await;

    let sold = responses
        .iter()
        .filter(|resp| resp.as_ref().unwrap().status() == StatusCode::OK)
        .count();
    assert_eq!(sold, 3);

    let mut resp = srv.get("/inventory/7").send().await.unwrap();
    let wax: Value = resp.json().await.unwrap();
    assert_eq!(wax["quantity"], 0);

    let mut resp = srv.get("/invoices").send().await.unwrap();
    let invoices: Value = resp.json().await.unwrap();
    let mut numbers: Vec<&str> = invoices
        .as_array()
        .unwrap()
        .iter()
        .map(|invoice| invoice["number"].as_str().unwrap())
        .collect();
    numbers.sort();
    assert_eq!(numbers, vec!["001-0001", "001-0002", "001-0003"]);
}

#[actix_web::test]
async fn test_admin_header_over_the_wire() {
    let srv = spawn_server(memory_state());

    let resp = srv
        .post("/inventory")
        .send_json(&product_payload("Ambientador", 10))
        .await
        .unwrap();
    assert_status(&resp, StatusCode::UNAUTHORIZED);

    let resp = srv
        .post("/inventory")
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .send_json(&product_payload("Ambientador", 10))
        .await
        .unwrap();
    assert_status(&resp, StatusCode::CREATED);

    let mut resp = srv
        .post("/admin/validate")
        .send_json(&json!({ "password": ADMIN_PASSWORD }))
        .await
        .unwrap();
    assert_status(&resp, StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], true);
}
