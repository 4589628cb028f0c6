use reqwest::StatusCode;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Errors that can occur when talking to the admin backend
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Backend returned error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    /// A protected endpoint answered 401. The session has already been
    /// cleared and the login redirect issued by the time a caller sees this.
    #[error("Session expired while calling {path}")]
    SessionExpired { path: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AdminError {
    /// HTTP status of the failed call, if the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AdminError::Api { status, .. } => Some(*status),
            AdminError::SessionExpired { .. } => Some(StatusCode::UNAUTHORIZED),
            AdminError::Http(err) => err.status(),
            _ => None,
        }
    }

    /// Backend-supplied message when present, otherwise `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            AdminError::Api {
                message: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            AdminError::SessionExpired { .. } => "Session expired. Please login again.".to_string(),
            AdminError::Validation(_) => "Please fix the errors in the form".to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, AdminError::SessionExpired { .. })
    }
}

impl From<ValidationErrors> for AdminError {
    fn from(errors: ValidationErrors) -> Self {
        AdminError::Validation(errors)
    }
}

/// Result type for admin API operations
pub type Result<T> = std::result::Result<T, AdminError>;
