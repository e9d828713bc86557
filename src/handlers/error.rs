// src/handlers/error.rs
use std::fmt;
use warp::reject::Reject;

use crate::error::WaccError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApiErrorKind {
    /// Bad or insufficient input data (422).
    InvalidInput,
    /// Upstream data source failed (502).
    External,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::InvalidInput,
            message: message.into(),
        }
    }

    pub fn external_error(message: impl Into<String>) -> Self {
        ApiError {
            kind: ApiErrorKind::External,
            message: message.into(),
        }
    }
}

// Every pipeline failure is a data problem, not a server fault.
impl From<WaccError> for ApiError {
    fn from(err: WaccError) -> Self {
        ApiError::invalid_input(err.to_string())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
