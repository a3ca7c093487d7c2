use std::time::Duration;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// Upper bound on the readiness ping so a hung pool does not hang readiness
const DATABASE_PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseStatus {
    Ok,
    Unavailable,
    /// In-memory backend, no pool to check
    NotConfigured,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessChecks {
    pub database: DatabaseStatus,
}

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /ready, 503 while the database cannot be reached
pub async fn readiness_check(pool: Option<web::Data<MySqlPool>>) -> HttpResponse {
    let database = match pool {
        Some(pool) => ping(pool.get_ref()).await,
        None => DatabaseStatus::NotConfigured,
    };

    let ready = database != DatabaseStatus::Unavailable;
    let body = ReadinessResponse {
        ready,
        checks: ReadinessChecks { database },
    };

    if ready {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

async fn ping(pool: &MySqlPool) -> DatabaseStatus {
    let query = sqlx::query("SELECT 1").execute(pool);

    match tokio::time::timeout(DATABASE_PING_TIMEOUT, query).await {
        Ok(Ok(_)) => DatabaseStatus::Ok,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Database readiness check failed");
            DatabaseStatus::Unavailable
        }
        Err(_) => {
            tracing::error!(
                timeout_ms = DATABASE_PING_TIMEOUT.as_millis() as u64,
                "Database readiness check timed out"
            );
            DatabaseStatus::Unavailable
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
