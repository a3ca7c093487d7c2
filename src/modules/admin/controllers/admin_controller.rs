use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::core::AppError;
use crate::middleware::{AdminAction, AdminAuthorizer, AdminCredentials};

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateAdminResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Check an admin password without performing any action
/// POST /admin/validate
pub async fn validate_admin(
    authorizer: web::Data<dyn AdminAuthorizer>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let credentials = AdminCredentials::from_parts(req.headers(), &body);

    match authorizer
        .authorize(&credentials, AdminAction::ValidateAdmin)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ValidateAdminResponse {
            valid: true,
            message: None,
        })),
        Err(AppError::Unauthorized(message)) => {
            Ok(HttpResponse::Unauthorized().json(ValidateAdminResponse {
                valid: false,
                message: Some(message),
            }))
        }
        Err(e) => Err(e),
    }
}

/// Configure admin routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/admin").route("/validate", web::post().to(validate_admin)));
}
