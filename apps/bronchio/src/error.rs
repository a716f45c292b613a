//! Application error type.

use bronchio_core::BronchioError;
use thiserror::Error;

/// Errors surfaced by CLI commands and the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input or policy rejected by the engine.
    #[error(transparent)]
    Engine(#[from] BronchioError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A command-line argument combination that cannot be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

pub type AppResult<T> = Result<T, AppError>;
