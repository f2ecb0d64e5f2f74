use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::db::error::StoreError;
use crate::utils::api_response::ApiResponse;

/// Coarse classification the HTTP layer switches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Unauthorized,
    Conflict,
    Internal,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("access denied: {0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: StoreError,
    },
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::Unauthorized(_) => ErrorKind::Unauthorized,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Storage { .. } | AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} not found"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

/// Attaches context to storage failures on their way up to the service layer.
pub trait StoreContext<T> {
    fn context(self, context: &str) -> Result<T, AppError>;
}

impl<T> StoreContext<T> for Result<T, StoreError> {
    fn context(self, context: &str) -> Result<T, AppError> {
        self.map_err(|source| AppError::Storage {
            context: context.to_string(),
            source,
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        // Driver errors stay in the log; clients only see the context.
        let message = match &self {
            AppError::Storage { context, source } => {
                tracing::error!("{context}: {source}");
                context.clone()
            }
            AppError::Internal(message) => {
                tracing::error!("{message}");
                message.clone()
            }
            other => other.to_string(),
        };
        ApiResponse::<()>::error(kind.status_code(), message, None).into_response()
    }
}
