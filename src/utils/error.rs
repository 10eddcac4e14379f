// Error handling utilities
// Author: Gabriel Demetrios Lafis

use thiserror::Error;

use crate::data::DataError;
use crate::processing::ProcessingError;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("{0}")]
    Processing(#[from] ProcessingError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Process exit code for this error.
    ///
    /// Configuration problems share code 2 with argument parser usage errors,
    /// which exit before reaching here.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config(_) | AppError::Processing(ProcessingError::UnknownStatistic(_)) => 2,
            AppError::Processing(ProcessingError::Protocol { .. }) => 3,
            AppError::Processing(ProcessingError::EmptyValueSet) => 4,
            _ => 1,
        }
    }
}

/// Result type alias for AppError
pub type AppResult<T> = Result<T, AppError>;
