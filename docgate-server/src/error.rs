use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use docgate::error::DocumentStoreError;
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: max {0}MB allowed")]
    PayloadTooLarge(usize),

    #[error("Not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] DocumentStoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Store(DocumentStoreError::MalformedPayload(_)) => StatusCode::BAD_REQUEST,
            ServerError::Store(DocumentStoreError::InvalidDocument(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Store(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Store(DocumentStoreError::MalformedPayload(_)) => "BAD_REQUEST",
            ServerError::Store(DocumentStoreError::InvalidDocument(_)) => "INVALID_DOCUMENT",
            ServerError::Store(_) => "STORE_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
