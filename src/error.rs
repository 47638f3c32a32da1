use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Content not found (HTTP {status}): {path}")]
    NotFound { path: String, status: u16 },

    #[error("Remote content error: {message}")]
    Remote { message: String },

    #[error("Invalid content path: {path}")]
    InvalidPath { path: String },

    #[error("Settings error: {message}")]
    Settings { message: String },
}

impl FolioError {
    pub fn remote(message: impl Into<String>) -> Self {
        FolioError::Remote {
            message: message.into(),
        }
    }

    /// HTTP status reported by the content source when the file was missing.
    pub fn missing_status(&self) -> Option<u16> {
        match self {
            FolioError::NotFound { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl ResponseError for FolioError {
    fn status_code(&self) -> StatusCode {
        match self {
            FolioError::NotFound { .. } => StatusCode::NOT_FOUND,
            FolioError::InvalidPath { .. } => StatusCode::BAD_REQUEST,
            FolioError::Remote { .. } => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
