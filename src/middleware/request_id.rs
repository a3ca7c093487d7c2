// Request correlation ids. Install with
// `App::new().wrap(actix_web::middleware::from_fn(request_id))`.

use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue},
    middleware::Next,
    Error, HttpMessage,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is accepted as-is
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request identifier stored in the request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdValue(pub String);

impl RequestIdValue {
    /// Reuse the caller's id when it is short printable ASCII, otherwise
    /// mint a fresh UUID
    fn from_request(req: &ServiceRequest) -> Self {
        let supplied = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| is_acceptable(id));

        match supplied {
            Some(id) => Self(id.to_string()),
            None => Self(Uuid::new_v4().to_string()),
        }
    }
}

fn is_acceptable(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_REQUEST_ID_LEN && id.bytes().all(|b| b.is_ascii_graphic())
}

/// Tags every request with an id and echoes it on the response so a receipt
/// printed at the till can be matched to the server logs.
pub async fn request_id(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let id = RequestIdValue::from_request(&req);
    req.extensions_mut().insert(id.clone());

    tracing::debug!(
        request_id = %id.0,
        method = %req.method(),
        path = %req.path(),
        "Incoming request"
    );

    let mut res = next.call(req).await?;

    if let Ok(value) = HeaderValue::from_str(&id.0) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    tracing::debug!(request_id = %id.0, status = %res.status(), "Request completed");

    Ok(res)
}
