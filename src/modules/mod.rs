pub mod admin;
pub mod appointments;
pub mod catalog;
pub mod health;
pub mod inventory;
pub mod invoices;
pub mod reports;
pub mod taxes;
