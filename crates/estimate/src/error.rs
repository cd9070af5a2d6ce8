//! Estimate domain errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Quote file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid menu item '{id}': {reason}")]
    InvalidItem { id: String, reason: String },

    #[error("Invalid business configuration: {0}")]
    InvalidStandards(String),

    #[error("Unknown event type: {0}")]
    UnknownEventType(String),
}

pub type Result<T> = std::result::Result<T, EstimateError>;
