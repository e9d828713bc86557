// src/error.rs
use thiserror::Error;

/// Errors the WACC pipeline can raise. Every stage either succeeds or
/// reports exactly one of these; no stage substitutes defaults.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaccError {
    /// Insufficient or non-overlapping price history.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// Zero-variance regressor, regression undefined.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Zero interest expense, coverage ratio undefined.
    #[error("division by zero: {0}")]
    DivisionByZero(String),

    /// Non-finite or non-positive valuation.
    #[error("invalid valuation: {0}")]
    InvalidValuation(String),
}
