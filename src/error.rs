use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed dataset at {path}: {message}")]
    Format { path: PathBuf, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read model bundle at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model bundle at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid model bundle: {0}")]
    Invalid(String),
    #[error("feature schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("inference failed: {0}")]
    Inference(String),
}

/// Raised while turning form values into a [`crate::features::PredictionRequest`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("incomplete request, missing: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),
    #[error("invalid input: {0}")]
    Invalid(String),
}

/// Errors that reach the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("session {0} not found")]
    SessionNotFound(String),
    #[error("action not available on the {0} page")]
    WrongPage(&'static str),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("background task failed: {0}")]
    Join(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::WrongPage(_) => StatusCode::CONFLICT,
            AppError::Dataset(_) | AppError::Model(_) | AppError::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
