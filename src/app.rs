// Application assembly: services over a storage backend, the admin
// authorizer, and the route table. `main` and the test helpers both build the
// actix `App` through `AppState::configure`.

use std::sync::Arc;

use actix_web::web;
use sqlx::MySqlPool;

use crate::config::{Config, StorageBackend};
use crate::core::{AppError, Result};
use crate::middleware::{configure_extractors, AdminAuthorizer};
use crate::modules::appointments::AppointmentService;
use crate::modules::catalog::CatalogService;
use crate::modules::inventory::InventoryService;
use crate::modules::invoices::InvoiceService;
use crate::modules::reports::ReportService;
use crate::modules::taxes::TaxCalculator;
use crate::modules::{admin, appointments, catalog, health, inventory, invoices, reports};
use crate::storage::{MemoryStore, Storage};

#[derive(Clone)]
pub struct AppState {
    pub invoices: web::Data<Arc<InvoiceService>>,
    pub inventory: web::Data<Arc<InventoryService>>,
    pub appointments: web::Data<Arc<AppointmentService>>,
    pub catalog: web::Data<Arc<CatalogService>>,
    pub reports: web::Data<Arc<ReportService>>,
    pub authorizer: web::Data<dyn AdminAuthorizer>,
    pub database: Option<web::Data<MySqlPool>>,
}

impl AppState {
    pub fn new(
        storage: Storage,
        tax_calculator: TaxCalculator,
        authorizer: Arc<dyn AdminAuthorizer>,
        database: Option<MySqlPool>,
    ) -> Self {
        Self {
            invoices: web::Data::new(Arc::new(InvoiceService::new(
                storage.invoices,
                tax_calculator,
            ))),
            inventory: web::Data::new(Arc::new(InventoryService::new(storage.inventory))),
            appointments: web::Data::new(Arc::new(AppointmentService::new(storage.appointments))),
            catalog: web::Data::new(Arc::new(CatalogService::new(storage.catalog))),
            reports: web::Data::new(Arc::new(ReportService::new(storage.reports))),
            authorizer: web::Data::from(authorizer),
            database: database.map(web::Data::new),
        }
    }

    /// Build the state the configuration asks for. For the MySQL backend this
    /// connects the pool and applies pending migrations.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let tax_calculator = config.billing.tax_calculator()?;
        let authorizer: Arc<dyn AdminAuthorizer> = Arc::new(config.security.authorizer()?);
        let prefix = config.billing.invoice_prefix.as_str();

        match (config.billing.storage_backend, &config.database) {
            (StorageBackend::Mysql, Some(database)) => {
                let pool = database.create_pool().await?;
                sqlx::migrate!("./migrations")
                    .run(&pool)
                    .await
                    .map_err(|e| AppError::internal(format!("Migration failed: {}", e)))?;

                tracing::info!(
                    pool_size = database.pool_size,
                    max_connections = database.max_connections,
                    "MySQL storage ready"
                );

                Ok(Self::new(
                    Storage::mysql(pool.clone(), prefix),
                    tax_calculator,
                    authorizer,
                    Some(pool),
                ))
            }
            (StorageBackend::Mysql, None) => Err(AppError::Configuration(
                "DATABASE_URL must be set for the mysql storage backend".to_string(),
            )),
            (StorageBackend::Memory, _) => {
                tracing::warn!("Using in-memory storage; data is lost on restart");

                Ok(Self::new(
                    Storage::in_memory(MemoryStore::with_demo_catalog(prefix)?),
                    tax_calculator,
                    authorizer,
                    None,
                ))
            }
        }
    }

    /// Register shared data and every route
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.invoices.clone())
            .app_data(self.inventory.clone())
            .app_data(self.appointments.clone())
            .app_data(self.catalog.clone())
            .app_data(self.reports.clone())
            .app_data(self.authorizer.clone());

        if let Some(pool) = &self.database {
            cfg.app_data(pool.clone());
        }

        configure_extractors(cfg);

        health::controllers::configure(cfg);
        admin::controllers::configure(cfg);
        invoices::controllers::configure(cfg);
        inventory::controllers::configure(cfg);
        appointments::controllers::configure(cfg);
        catalog::controllers::configure(cfg);
        reports::controllers::configure(cfg);
    }
}
