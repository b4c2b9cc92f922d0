//! Error types for BTC Markets value types

use thiserror::Error;

/// Error parsing one of the closed string enums
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    /// Which enum was being parsed
    pub kind: &'static str,
    /// The rejected input
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Errors converting between whole and decimal amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// The scaled value does not fit in an i64
    #[error("amount {0} is out of range for a whole-unit value")]
    Overflow(String),

    /// A float could not be represented as a decimal (NaN or infinite)
    #[error("amount {0} is not a finite number")]
    NotFinite(String),
}
