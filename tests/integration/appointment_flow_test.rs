// Appointment booking over HTTP.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::StatusCode;
use actix_web::test;
use helpers::*;
use lavado::middleware::ADMIN_PASSWORD_HEADER;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_booking_is_open_and_listed_by_day() {
    let app = init_app(memory_state()).await;

    for (date, time) in [
        ("2025-01-15", "14:00"),
        ("2025-01-16", "08:00"),
        ("2025-01-15", "09:30"),
    ] {
        let req = test::TestRequest::post()
            .uri("/appointments")
            .set_json(appointment_payload(date, time))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/appointments?date=2025-01-15")
        .to_request();
    let day: Value = test::call_and_read_body_json(&app, req).await;
    let times: Vec<&str> = day
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["time"].as_str().unwrap())
        .collect();
    assert_eq!(times, vec!["09:30", "14:00"]);
    assert_eq!(day[0]["status"], "scheduled");
    assert_eq!(day[0]["servicePrice"], "150.00");

    let req = test::TestRequest::get().uri("/appointments").to_request();
    let all: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn test_invalid_booking_is_rejected() {
    let app = init_app(memory_state()).await;

    for payload in [
        appointment_payload("2025-13-01", "09:00"),
        appointment_payload("2025-01-15", "9am"),
        json!({ "customerName": "Ana", "date": "2025-01-15", "time": "09:00" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/appointments")
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "payload: {}", payload);
    }

    let req = test::TestRequest::get()
        .uri("/appointments?date=ayer")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_changes_require_admin() {
    let app = init_app(memory_state()).await;

    let req = test::TestRequest::post()
        .uri("/appointments")
        .set_json(appointment_payload("2025-01-15", "10:00"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/appointments/{}", created["id"]);

    // Reading a single appointment is public
    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .set_json(json!({ "status": "completed", "time": "10:30" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["time"], "10:30");
    assert_eq!(updated["customerName"], "María López");

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header((ADMIN_PASSWORD_HEADER, ADMIN_PASSWORD))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
