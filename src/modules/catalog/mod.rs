// Wash service catalog (`/services`)

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::WashService;
pub use repositories::{MySqlWashServiceRepository, WashServiceRepository};
pub use services::CatalogService;
