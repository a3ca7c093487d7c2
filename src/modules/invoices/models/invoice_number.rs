// Invoice numbers have the shape `PPP-NNNN`: a fixed three-digit till prefix
// followed by the store-wide sequence, zero-padded to four digits.
// Sequences past 9999 keep growing (`001-10000`) rather than wrapping.

use std::fmt;
use std::str::FromStr;

use crate::core::{AppError, Result};

/// Till identifier printed on every receipt
pub const DEFAULT_INVOICE_PREFIX: &str = "001";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InvoiceNumber {
    prefix: String,
    sequence: u32,
}

impl InvoiceNumber {
    pub fn new(prefix: &str, sequence: u32) -> Result<Self> {
        Self::validate_prefix(prefix)?;

        if sequence == 0 {
            return Err(AppError::validation("Invoice sequence starts at 1"));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            sequence,
        })
    }

    /// Number that follows a counter currently at `last_sequence`
    pub fn after(prefix: &str, last_sequence: u32) -> Result<Self> {
        let next = last_sequence
            .checked_add(1)
            .ok_or_else(|| AppError::internal("Invoice sequence exhausted"))?;
        Self::new(prefix, next)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Prefix must be exactly three ASCII digits
    pub fn validate_prefix(prefix: &str) -> Result<()> {
        if prefix.len() != 3 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::Configuration(format!(
                "Invoice prefix must be three digits, got '{}'",
                prefix
            )));
        }
        Ok(())
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}", self.prefix, self.sequence)
    }
}

impl FromStr for InvoiceNumber {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let (prefix, sequence) = s
            .split_once('-')
            .ok_or_else(|| AppError::validation(format!("Invalid invoice number: {}", s)))?;

        if sequence.len() < 4 || !sequence.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::validation(format!("Invalid invoice number: {}", s)));
        }

        let sequence = sequence
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid invoice number: {}", s)))?;

        Self::new(prefix, sequence)
            .map_err(|_| AppError::validation(format!("Invalid invoice number: {}", s)))
    }
}
