// Admin authorization.
//
// Mutating back-office endpoints carry the admin password either in the JSON
// body (`password`) or in the `X-Admin-Password` header. `AdminGuard` wraps
// those resources, asks the configured `AdminAuthorizer` whether the caller may
// perform the resource's action, and puts the buffered body back so the
// handler can still extract it.

use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{self, forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header::HeaderMap, Method},
    web, Error,
};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use serde::Deserialize;

use crate::core::{AppError, Result as AppResult};

pub const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";

/// What the caller is trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    ManageInventory,
    ManageServices,
    ManageAppointments,
    ManageInvoices,
    ValidateAdmin,
}

impl std::fmt::Display for AdminAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminAction::ManageInventory => write!(f, "manage_inventory"),
            AdminAction::ManageServices => write!(f, "manage_services"),
            AdminAction::ManageAppointments => write!(f, "manage_appointments"),
            AdminAction::ManageInvoices => write!(f, "manage_invoices"),
            AdminAction::ValidateAdmin => write!(f, "validate_admin"),
        }
    }
}

/// Credentials presented with a request
#[derive(Debug, Clone, Default)]
pub struct AdminCredentials {
    pub password: Option<String>,
}

#[derive(Deserialize)]
struct PasswordField {
    #[serde(default)]
    password: Option<String>,
}

impl AdminCredentials {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
        }
    }

    /// The header wins over the body; a body that is not a JSON object simply
    /// carries no password.
    pub fn from_parts(headers: &HeaderMap, body: &[u8]) -> Self {
        let from_header = headers
            .get(ADMIN_PASSWORD_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        let password = from_header.or_else(|| {
            serde_json::from_slice::<PasswordField>(body)
                .ok()
                .and_then(|field| field.password)
        });

        Self { password }
    }
}

/// Decides whether a caller may perform an admin action
#[async_trait]
pub trait AdminAuthorizer: Send + Sync {
    async fn authorize(&self, credentials: &AdminCredentials, action: AdminAction) -> AppResult<()>;
}

/// Single shop-wide admin secret, kept only as an Argon2 PHC hash
pub struct SharedSecretAuthorizer {
    password_hash: Arc<str>,
}

impl SharedSecretAuthorizer {
    /// # Arguments
    /// * `password_hash` - Argon2 PHC string, e.g. from `ADMIN_PASSWORD_HASH`
    pub fn new(password_hash: impl Into<String>) -> AppResult<Self> {
        let password_hash: String = password_hash.into();
        PasswordHash::new(&password_hash).map_err(|e| {
            AppError::Configuration(format!("Invalid admin password hash: {}", e))
        })?;

        Ok(Self {
            password_hash: Arc::from(password_hash),
        })
    }

    /// Hash a plaintext secret at startup
    pub fn from_password(password: &str) -> AppResult<Self> {
        Self::new(hash_admin_password(password)?)
    }
}

#[async_trait]
impl AdminAuthorizer for SharedSecretAuthorizer {
    async fn authorize(&self, credentials: &AdminCredentials, action: AdminAction) -> AppResult<()> {
        let password = credentials
            .password
            .clone()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::unauthorized("Admin password required"))?;

        let hash = self.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || verify_admin_password(&password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))??;

        if !valid {
            tracing::warn!(action = %action, "Admin authorization rejected");
            return Err(AppError::unauthorized("Invalid admin password"));
        }

        tracing::debug!(action = %action, "Admin authorized");
        Ok(())
    }
}

/// Hash a secret using Argon2 with a random salt
pub fn hash_admin_password(password: &str) -> AppResult<String> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash admin password: {}", e)))
}

/// Verify a secret against an Argon2 PHC hash
pub fn verify_admin_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Route guard for admin-only resources. Safe methods (GET, HEAD, OPTIONS)
/// pass through untouched, so a resource can mix public reads with guarded
/// writes.
#[derive(Debug, Clone, Copy)]
pub struct AdminGuard {
    action: AdminAction,
}

impl AdminGuard {
    pub fn new(action: AdminAction) -> Self {
        Self { action }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AdminGuardMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminGuardMiddleware {
            service: Rc::new(service),
            action: self.action,
        }))
    }
}

pub struct AdminGuardMiddleware<S> {
    service: Rc<S>,
    action: AdminAction,
}

impl<S, B> Service<ServiceRequest> for AdminGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let action = self.action;

        Box::pin(async move {
            if is_safe_method(req.method()) {
                return Ok(svc.call(req).await?.map_into_left_body());
            }

            let Some(authorizer) = req.app_data::<web::Data<dyn AdminAuthorizer>>().cloned()
            else {
                let err = AppError::internal("Admin authorizer is not configured");
                return Ok(req.error_response(err).map_into_right_body());
            };

            let body = match req.extract::<web::Bytes>().await {
                Ok(body) => body,
                Err(e) => return Ok(req.error_response(e).map_into_right_body()),
            };

            let credentials = AdminCredentials::from_parts(req.headers(), &body);
            req.set_payload(bytes_to_payload(body));

            if let Err(e) = authorizer.authorize(&credentials, action).await {
                return Ok(req.error_response(e).map_into_right_body());
            }

            Ok(svc.call(req).await?.map_into_left_body())
        })
    }
}

fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn bytes_to_payload(buf: web::Bytes) -> dev::Payload {
    let (_, mut payload) = actix_http::h1::Payload::create(true);
    payload.unread_data(buf);
    dev::Payload::from(payload)
}
