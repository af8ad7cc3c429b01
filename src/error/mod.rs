use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::{config::ConfigError, models::ParseTweetIdError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("corrupt key in {tree}: {key:?}")]
    CorruptKey { tree: &'static str, key: Vec<u8> },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Invalid tweet id")]
    MalformedId(#[from] ParseTweetIdError),

    #[error("Tweet not found")]
    NotFound,

    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl From<Vec<String>> for AppError {
    fn from(errors: Vec<String>) -> Self {
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(errors) => {
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(errors)).into_response();
            }
            AppError::MalformedPayload | AppError::MalformedId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store { context, source } => {
                error!(error = %source, "{context}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

/// Attaches the client-facing message used when a store call fails.
pub trait StoreContext<T> {
    fn context(self, context: &'static str) -> Result<T, AppError>;
}

impl<T> StoreContext<T> for Result<T, StoreError> {
    fn context(self, context: &'static str) -> Result<T, AppError> {
        self.map_err(|source| AppError::Store { context, source })
    }
}

/// Failures that stop the process before it starts serving.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),

    #[error("server error: {0}")]
    Server(#[source] Box<dyn std::error::Error + Send + Sync>),
}
