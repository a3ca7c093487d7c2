// Assertions on the JSON error envelope and on live-server responses.

use actix_web::http::StatusCode;
use awc::ClientResponse;
use serde_json::Value;

/// Check the `{message, error: {code, kind}}` body every failure returns
pub fn assert_error_body(body: &Value, status: StatusCode, kind: &str) {
    assert_eq!(
        body["error"]["code"].as_u64(),
        Some(u64::from(status.as_u16())),
        "unexpected error body: {}",
        body
    );
    assert_eq!(body["error"]["kind"], kind, "unexpected error body: {}", body);
    assert!(body["message"].is_string(), "missing message: {}", body);
}

pub fn assert_status<S>(response: &ClientResponse<S>, expected: StatusCode) {
    let status = response.status();
    assert_eq!(
        status,
        expected,
        "Expected {}, got {} {}",
        expected.as_u16(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );
}
