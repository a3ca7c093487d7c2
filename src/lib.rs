//! Lavado: car-wash point-of-sale backend
//!
//! Invoicing with atomic stock deduction and sequential receipt numbers,
//! inventory of products and wash services, appointment booking, the wash
//! menu and period reports.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod storage;

// Re-export commonly used types
pub use app::AppState;
pub use modules::appointments;
pub use modules::catalog;
pub use modules::inventory;
pub use modules::invoices;
pub use modules::reports;
pub use modules::taxes;
