use std::path::PathBuf;

use admin_sdk::AdminError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported image file: {0}")]
    UnsupportedImage(PathBuf),

    #[error("Session expired. Please login again.")]
    SessionExpired { location: String },

    /// A backend or validation failure, already rendered for the operator.
    #[error("{message}")]
    Command {
        message: String,
        #[source]
        source: AdminError,
    },

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl ConsoleError {
    /// Wrap an SDK failure, preferring the backend's message over `fallback`.
    pub fn command(source: AdminError, fallback: &str) -> Self {
        let message = match &source {
            AdminError::Validation(errors) => {
                format!("{}: {}", source.message_or(fallback), errors)
            }
            _ => source.message_or(fallback),
        };
        ConsoleError::Command { message, source }
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConsoleError::SessionExpired { .. } => 2,
            ConsoleError::Configuration(_) => 78,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
