pub mod appointment_repository;

pub use appointment_repository::{AppointmentRepository, MySqlAppointmentRepository};
