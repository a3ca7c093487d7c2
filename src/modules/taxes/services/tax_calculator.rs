use rust_decimal::Decimal;

use crate::core::error::AppError;
use crate::core::money;

/// ISV (Impuesto Sobre Ventas) rate applied when nothing else is configured.
///
/// The shop currently does not charge ISV on receipts, so the default is zero.
/// Deployments that must charge it set `ISV_TAX_RATE` (e.g. `0.15`).
pub const DEFAULT_ISV_RATE: Decimal = Decimal::ZERO;

/// TaxCalculator holds the single sales-tax rate used for every invoice
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator {
    rate: Decimal,
}

impl TaxCalculator {
    /// Build a calculator for `rate`, rejecting rates outside 0..=1 or with
    /// more than 4 decimal places
    pub fn new(rate: Decimal) -> Result<Self, AppError> {
        Self::validate_tax_rate(rate)?;
        Ok(Self { rate })
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Tax owed on `subtotal`, rounded to two decimals
    ///
    /// tax = subtotal × rate
    pub fn calculate_tax(&self, subtotal: Decimal) -> Result<Decimal, AppError> {
        let tax = money::checked_mul("Tax", subtotal, self.rate)?;
        Ok(money::round(tax))
    }

    /// Validate tax rate is within acceptable range (0-1.0) with max 4 decimal places
    pub fn validate_tax_rate(tax_rate: Decimal) -> Result<(), AppError> {
        if tax_rate < Decimal::ZERO {
            return Err(AppError::Validation(
                "Tax rate cannot be negative".to_string(),
            ));
        }

        if tax_rate > Decimal::ONE {
            return Err(AppError::Validation(
                "Tax rate cannot exceed 1.0 (100%)".to_string(),
            ));
        }

        if tax_rate.normalize().scale() > 4 {
            return Err(AppError::Validation(
                "Tax rate cannot have more than 4 decimal places".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self {
            rate: DEFAULT_ISV_RATE,
        }
    }
}
