pub mod tax_calculator;

pub use tax_calculator::{TaxCalculator, DEFAULT_ISV_RATE};
