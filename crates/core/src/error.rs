//! Error types for the core library

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export error: {0}")]
    Export(#[from] csv::Error),
}

impl Error {
    /// Message safe to show the user as-is
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) | Error::ConfirmationRequired(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
