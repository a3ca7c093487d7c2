pub mod services;

pub use services::{TaxCalculator, DEFAULT_ISV_RATE};
