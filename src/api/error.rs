use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{error, warn};
use serde::Serialize;

use crate::error::ModelError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure on its way out of a handler: either the model refused the
/// request or the body never made it into a typed payload.
#[derive(Debug)]
pub enum ApiError {
    Model(ModelError),
    Payload(JsonRejection),
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        ApiError::Model(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Payload(rejection)
    }
}

impl ApiError {
    /// Status code and client-facing message for each failure class.
    /// Validation, association, conflict and payload failures stay 500 for
    /// compatibility with existing clients.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Model(err @ ModelError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            ApiError::Model(
                err @ (ModelError::Validation(_)
                | ModelError::Association { .. }
                | ModelError::Conflict { .. }),
            ) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Model(ModelError::Store(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::Payload(rejection) => {
                (StatusCode::INTERNAL_SERVER_ERROR, rejection.body_text())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            ApiError::Model(ModelError::Store(e)) => error!("Store failure: {:#}", e),
            ApiError::Model(other) if status.is_server_error() => {
                warn!("Request failed: {}", other)
            }
            ApiError::Payload(_) => warn!("Rejected request body: {}", message),
            _ => {}
        }
        (status, Json(ErrorResponse::new(&message))).into_response()
    }
}
