// Checkout over HTTP: totals, receipt numbering and atomic stock deduction.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::StatusCode;
use actix_web::test;
use helpers::*;
use lavado::storage::MemoryStore;
use lavado::taxes::TaxCalculator;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_create_invoice_returns_receipt() {
    let app = init_app(memory_state()).await;

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(invoice_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let invoice = &body["invoice"];
    assert_eq!(invoice["number"], "001-0001");
    assert_eq!(invoice["customerName"], "Juan Pérez");
    assert_eq!(invoice["subtotal"], "80.00");
    assert_eq!(invoice["tax"], "0.00");
    assert_eq!(invoice["total"], "80.00");
    assert_eq!(invoice["status"], "pending");
    assert_eq!(invoice["date"], BUSINESS_DATE);

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["serviceName"], "Lavado Básico");
    assert_eq!(items[0]["total"], "80.00");
    assert_eq!(items[0]["invoiceId"], invoice["id"]);
}

#[actix_web::test]
async fn test_numbers_increase_per_invoice() {
    let app = init_app(memory_state()).await;

    let mut numbers = Vec::new();
    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/invoices")
            .set_json(invoice_payload())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        numbers.push(body["invoice"]["number"].as_str().unwrap().to_string());
    }

    assert_eq!(numbers, vec!["001-0001", "001-0002", "001-0003"]);
}

#[actix_web::test]
async fn test_isv_is_applied_to_subtotal() {
    let tax = TaxCalculator::new(dec!(0.15)).unwrap();
    let app = init_app(state_with(MemoryStore::new("002"), tax)).await;

    let payload = json!({
        "customer": { "name": "Taxi Ejecutivo", "taxId": "08011990123456" },
        "items": [
            { "serviceName": "Lavado Completo", "quantity": 2, "unitPrice": "150.00" },
            { "serviceName": "Encerado", "quantity": 1, "unitPrice": 200 }
        ],
        "date": BUSINESS_DATE
    });
    let req = test::TestRequest::post().uri("/invoices").set_json(payload).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let invoice = &body["invoice"];
    assert_eq!(invoice["number"], "002-0001");
    assert_eq!(invoice["subtotal"], "500.00");
    assert_eq!(invoice["tax"], "75.00");
    assert_eq!(invoice["total"], "575.00");
    assert_eq!(invoice["customerTaxId"], "08011990123456");
}

#[actix_web::test]
async fn test_sale_deducts_stock() {
    let app = init_app(demo_state()).await;

    // Champú para Autos (6) has 25 units; Lavado Básico (1) is a service
    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(invoice_with_stock(&[(6, 4), (1, 10)]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/inventory/6").to_request();
    let shampoo: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(shampoo["quantity"], 21);

    let req = test::TestRequest::get().uri("/inventory/1").to_request();
    let wash: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wash["quantity"], Value::Null);
}

#[actix_web::test]
async fn test_insufficient_stock_rolls_back_everything() {
    let app = init_app(demo_state()).await;

    // Shampoo is available but Cera Automotriz (7) only has 3 units
    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(invoice_with_stock(&[(6, 2), (7, 5)]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_error_body(&body, StatusCode::BAD_REQUEST, "insufficient_stock");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Cera Automotriz"), "{}", message);
    assert!(message.contains("requested 5"), "{}", message);
    assert!(message.contains("available 3"), "{}", message);

    let req = test::TestRequest::get().uri("/invoices").to_request();
    let invoices: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(invoices.as_array().unwrap().len(), 0);

    let req = test::TestRequest::get().uri("/inventory/6").to_request();
    let shampoo: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(shampoo["quantity"], 25);

    // The failed checkout did not consume a number
    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(invoice_with_stock(&[(7, 3)]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["invoice"]["number"], "001-0001");

    let req = test::TestRequest::get().uri("/inventory/7").to_request();
    let wax: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(wax["quantity"], 0);
}

#[actix_web::test]
async fn test_unknown_inventory_item_is_not_found() {
    let app = init_app(demo_state()).await;

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(invoice_with_stock(&[(999, 1)]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_error_body(&body, StatusCode::NOT_FOUND, "not_found");
}

#[actix_web::test]
async fn test_invalid_requests_are_rejected() {
    let app = init_app(memory_state()).await;

    let cases = vec![
        json!({ "customer": { "name": "Juan" }, "items": [], "date": BUSINESS_DATE }),
        json!({
            "customer": { "name": " " },
            "items": [{ "serviceName": "Lavado", "quantity": 1, "unitPrice": 80 }],
            "date": BUSINESS_DATE
        }),
        json!({
            "customer": { "name": "Juan" },
            "items": [{ "serviceName": "Lavado", "quantity": 0, "unitPrice": 80 }],
            "date": BUSINESS_DATE
        }),
        json!({
            "customer": { "name": "Juan" },
            "items": [{ "serviceName": "Lavado", "quantity": 1, "unitPrice": 80 }],
            "date": "15/01/2025"
        }),
        json!({ "customer": { "name": "Juan" }, "date": BUSINESS_DATE }),
        invoice_with_stock(&[(6, 0)]),
    ];

    for payload in cases {
        let req = test::TestRequest::post()
            .uri("/invoices")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_error_body(&body, StatusCode::BAD_REQUEST, "validation");
    }

    let req = test::TestRequest::get().uri("/invoices").to_request();
    let invoices: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(invoices.as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_oversized_amounts_are_validation_errors() {
    let app = init_app(demo_state()).await;

    let line = |quantity: i64, price: &str| {
        json!({ "serviceName": "Flota completa", "quantity": quantity, "unitPrice": price })
    };
    let cases = vec![
        vec![line(2_000_000, "79228162514264337593543950")],
        vec![line(1, "100000000.00")],
        vec![line(2_000_000, "50000.00")],
        vec![line(1, "60000000.00"), line(1, "60000000.00")],
    ];

    for items in cases {
        let payload = json!({
            "customer": { "name": "Transportes del Valle" },
            "items": items,
            "date": BUSINESS_DATE,
            "inventoryItems": [{ "id": 6, "quantity": 1 }]
        });
        let req = test::TestRequest::post()
            .uri("/invoices")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_error_body(&body, StatusCode::BAD_REQUEST, "validation");
    }

    // Nothing was stored and no stock moved
    let req = test::TestRequest::get().uri("/invoices").to_request();
    let invoices: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(invoices.as_array().unwrap().len(), 0);

    let req = test::TestRequest::get().uri("/inventory/6").to_request();
    let shampoo: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(shampoo["quantity"], 25);

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(invoice_payload())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["invoice"]["number"], "001-0001");
}

#[actix_web::test]
async fn test_get_and_list_invoices() {
    let app = init_app(memory_state()).await;

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/invoices")
            .set_json(invoice_payload())
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/invoices").to_request();
    let invoices: Value = test::call_and_read_body_json(&app, req).await;
    let numbers: Vec<&str> = invoices
        .as_array()
        .unwrap()
        .iter()
        .map(|invoice| invoice["number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["001-0002", "001-0001"]);

    let id = invoices[1]["id"].as_i64().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/invoices/{}", id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["invoice"]["number"], "001-0001");
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/invoices/404").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_status_change_requires_admin() {
    let app = init_app(memory_state()).await;

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(invoice_payload())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["invoice"]["id"].as_i64().unwrap();
    let uri = format!("/invoices/{}/status", id);

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "status": "paid" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "status": "paid", "password": ADMIN_PASSWORD }))
        .to_request();
    let paid: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(paid["status"], "paid");
    assert_eq!(paid["total"], "80.00");

    // Paid invoices cannot go back to pending
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("X-Admin-Password", ADMIN_PASSWORD))
        .set_json(json!({ "status": "pending" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri(&format!("/invoices/{}", id)).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["invoice"]["status"], "paid");
}
