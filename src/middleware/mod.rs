pub mod auth;
pub mod error_handler;
pub mod request_id;

pub use auth::{
    hash_admin_password, verify_admin_password, AdminAction, AdminAuthorizer, AdminCredentials,
    AdminGuard, SharedSecretAuthorizer, ADMIN_PASSWORD_HEADER,
};
pub use error_handler::{configure_extractors, json_error_handler};
pub use request_id::{request_id, RequestIdValue, REQUEST_ID_HEADER};
