use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::{AppError, Result};

/// Lempira amounts are kept with two decimal places everywhere
pub const SCALE: u32 = 2;

/// Largest amount a `DECIMAL(10,2)` column holds: 99,999,999.99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, SCALE);

/// Round to two decimals (half away from zero) and pin the scale, so that
/// `80` is stored and serialized as `80.00`.
pub fn round(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(SCALE);
    rounded
}

/// Validates a caller-supplied amount: non-negative, at most two decimals and
/// no larger than `MAX_AMOUNT`
pub fn validate_amount(field: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(AppError::validation(format!(
            "{} must be non-negative, got: {}",
            field, amount
        )));
    }

    if amount.normalize().scale() > SCALE {
        return Err(AppError::validation(format!(
            "{} must have at most {} decimal places, got: {}",
            field, SCALE, amount
        )));
    }

    ensure_storable(field, amount)?;

    Ok(())
}

/// Rejects a computed amount that would not fit the money columns
pub fn ensure_storable(field: &str, amount: Decimal) -> Result<Decimal> {
    if amount > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{} exceeds the maximum of {}, got: {}",
            field, MAX_AMOUNT, amount
        )));
    }

    Ok(amount)
}

/// `a × b`, or a validation error naming `field` when the product cannot be
/// represented
pub fn checked_mul(field: &str, a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| AppError::validation(format!("{} is too large", field)))
}

/// `a + b`, or a validation error naming `field` on overflow
pub fn checked_add(field: &str, a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| AppError::validation(format!("{} is too large", field)))
}

/// Formats an amount for display, e.g. `L 150.00`
pub fn format_amount(amount: Decimal) -> String {
    format!("L {}", round(amount))
}
