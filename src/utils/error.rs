use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Upstream request failed: {0}")]
    UpstreamError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Missing file in field `{field}`")]
    MissingFile { field: String },

    #[error("Cannot reserve memory for {requested} elements")]
    AllocationError { requested: usize },

    #[error("Request body rejected: {message}")]
    BodyRejected { status: StatusCode, message: String },

    #[error("Worker task failed: {message}")]
    TaskError { message: String },
}

impl SandboxError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest { .. } | Self::MissingFile { .. } => StatusCode::BAD_REQUEST,
            Self::BodyRejected { status, .. } => *status,
            Self::IoError(_)
            | Self::SerializationError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::AllocationError { .. }
            | Self::TaskError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SandboxError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("❌ {}", self);
        } else {
            tracing::warn!("⚠️ {}", self);
        }

        // Callers only get the status reason, never internal details.
        let reason = status.canonical_reason().unwrap_or("Error");
        (status, reason).into_response()
    }
}

pub type Result<T> = std::result::Result<T, SandboxError>;
