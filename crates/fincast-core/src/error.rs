//! Error types for Fincast

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(String),

    #[error("Invalid numeric input: {0}")]
    InvalidNumericInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reject negative or non-finite amounts
pub(crate) fn ensure_amount(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::InvalidNumericInput(format!(
            "{} must be finite (got {})",
            field, value
        )));
    }
    if value < 0.0 {
        return Err(Error::InvalidNumericInput(format!(
            "{} must not be negative (got {})",
            field, value
        )));
    }
    Ok(value)
}

/// Reject non-finite values, allowing any sign
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidNumericInput(format!(
            "{} must be finite (got {})",
            field, value
        )))
    }
}
