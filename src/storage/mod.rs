// Storage backends.
//
// Every service talks to a repository trait object. `Storage` bundles one
// implementation of each trait, either MySQL (production) or the in-memory
// store (tests and demos). Both honor the same checkout contract.

pub mod memory;

use std::sync::Arc;

use sqlx::MySqlPool;

use crate::modules::appointments::repositories::{
    AppointmentRepository, MySqlAppointmentRepository,
};
use crate::modules::catalog::repositories::{MySqlWashServiceRepository, WashServiceRepository};
use crate::modules::inventory::repositories::{InventoryRepository, MySqlInventoryRepository};
use crate::modules::invoices::repositories::{InvoiceRepository, MySqlInvoiceRepository};
use crate::modules::reports::repositories::{MySqlReportRepository, ReportRepository};

pub use memory::MemoryStore;

#[derive(Clone)]
pub struct Storage {
    pub invoices: Arc<dyn InvoiceRepository>,
    pub inventory: Arc<dyn InventoryRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub catalog: Arc<dyn WashServiceRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

impl Storage {
    /// MySQL repositories sharing one pool
    pub fn mysql(pool: MySqlPool, invoice_prefix: &str) -> Self {
        Self {
            invoices: Arc::new(MySqlInvoiceRepository::new(pool.clone(), invoice_prefix)),
            inventory: Arc::new(MySqlInventoryRepository::new(pool.clone())),
            appointments: Arc::new(MySqlAppointmentRepository::new(pool.clone())),
            catalog: Arc::new(MySqlWashServiceRepository::new(pool.clone())),
            reports: Arc::new(MySqlReportRepository::new(pool)),
        }
    }

    /// Every repository backed by the same in-memory store
    pub fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);

        Self {
            invoices: store.clone(),
            inventory: store.clone(),
            appointments: store.clone(),
            catalog: store.clone(),
            reports: store,
        }
    }
}
