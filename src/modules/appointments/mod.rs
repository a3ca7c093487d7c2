// Appointments module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Appointment, AppointmentStatus};
pub use repositories::{AppointmentRepository, MySqlAppointmentRepository};
pub use services::AppointmentService;
