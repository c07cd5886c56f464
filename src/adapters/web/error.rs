//! HTTP error responses for web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::error::SignaldeskError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

pub fn status_from_error(err: &SignaldeskError) -> StatusCode {
    match err {
        SignaldeskError::ConfigMissing { .. }
        | SignaldeskError::ConfigInvalid { .. }
        | SignaldeskError::ConfigParse { .. }
        | SignaldeskError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        SignaldeskError::NotFound { .. } => StatusCode::NOT_FOUND,
        SignaldeskError::MarketData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SignaldeskError::Storage { .. } | SignaldeskError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<SignaldeskError> for WebError {
    fn from(err: SignaldeskError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
