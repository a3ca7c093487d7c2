use crate::core::{AppError, Result};
use crate::middleware::auth::SharedSecretAuthorizer;
use crate::modules::invoices::models::{InvoiceNumber, DEFAULT_INVOICE_PREFIX};
use crate::modules::taxes::{TaxCalculator, DEFAULT_ISV_RATE};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::str::FromStr;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    /// Present when `DATABASE_URL` is set; required by the MySQL backend
    pub database: Option<DatabaseConfig>,
    pub server: ServerConfig,
    pub billing: BillingConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Mysql,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::Mysql),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "STORAGE_BACKEND must be 'mysql' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    pub isv_tax_rate: Decimal,
    pub invoice_prefix: String,
    pub storage_backend: StorageBackend,
}

impl BillingConfig {
    pub fn tax_calculator(&self) -> Result<TaxCalculator> {
        TaxCalculator::new(self.isv_tax_rate)
    }
}

/// Admin secret. Either the Argon2 hash or the plaintext (hashed at startup).
#[derive(Clone, Default)]
pub struct SecurityConfig {
    pub admin_password_hash: Option<String>,
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("admin_password_hash", &self.admin_password_hash.as_ref().map(|_| "<set>"))
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SecurityConfig {
    pub fn authorizer(&self) -> Result<SharedSecretAuthorizer> {
        match (&self.admin_password_hash, &self.admin_password) {
            (Some(hash), _) => SharedSecretAuthorizer::new(hash.clone()),
            (None, Some(password)) => SharedSecretAuthorizer::from_password(password),
            (None, None) => Err(AppError::Configuration(
                "ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set".to_string(),
            )),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Config {
            app: AppConfig {
                env: var("APP_ENV").unwrap_or_else(|| "development".to_string()),
                log_level: var("LOG_LEVEL").unwrap_or_else(|| "debug".to_string()),
            },
            database: match var("DATABASE_URL") {
                Some(url) => Some(DatabaseConfig::from_lookup(url, &var)?),
                None => None,
            },
            server: ServerConfig::from_lookup(&var)?,
            billing: BillingConfig {
                isv_tax_rate: match var("ISV_TAX_RATE") {
                    Some(rate) => Decimal::from_str(rate.trim()).map_err(|_| {
                        AppError::Configuration(format!("Invalid ISV_TAX_RATE: {}", rate))
                    })?,
                    None => DEFAULT_ISV_RATE,
                },
                invoice_prefix: var("INVOICE_PREFIX")
                    .unwrap_or_else(|| DEFAULT_INVOICE_PREFIX.to_string()),
                storage_backend: var("STORAGE_BACKEND")
                    .map(|v| v.parse::<StorageBackend>())
                    .transpose()?
                    .unwrap_or(StorageBackend::Mysql),
            },
            security: SecurityConfig {
                admin_password_hash: var("ADMIN_PASSWORD_HASH"),
                admin_password: var("ADMIN_PASSWORD"),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        TaxCalculator::validate_tax_rate(self.billing.isv_tax_rate)
            .map_err(|e| AppError::Configuration(format!("ISV_TAX_RATE: {}", e)))?;

        InvoiceNumber::validate_prefix(&self.billing.invoice_prefix)?;

        if self.billing.storage_backend == StorageBackend::Mysql && self.database.is_none() {
            return Err(AppError::Configuration(
                "DATABASE_URL must be set for the mysql storage backend".to_string(),
            ));
        }

        if let Some(database) = &self.database {
            database.validate()?;
        }

        self.server.validate()?;

        if self.security.admin_password_hash.is_none() && self.security.admin_password.is_none() {
            return Err(AppError::Configuration(
                "ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set".to_string(),
            ));
        }

        Ok(())
    }
}
