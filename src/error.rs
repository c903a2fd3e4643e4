use std::collections::TryReserveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RotorForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Allocation Error: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("Worker Error: {0}")]
    Worker(String),
}

pub type RfResult<T> = Result<T, RotorForgeError>;
