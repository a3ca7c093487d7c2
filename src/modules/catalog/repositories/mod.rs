pub mod wash_service_repository;

pub use wash_service_repository::{MySqlWashServiceRepository, WashServiceRepository};
