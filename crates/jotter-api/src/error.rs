//! HTTP error responses.
//!
//! Handlers return `Result<_, ApiError>`. Store and view errors convert into
//! `ApiError` with `?`, and the status code is decided here, at the boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error};

/// Error returned by every handler and by the visit logging middleware.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(jotter_core::Error),
}

impl From<jotter_core::Error> for ApiError {
    fn from(err: jotter_core::Error) -> Self {
        match &err {
            jotter_core::Error::NotFound(_) | jotter_core::Error::NoteNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            jotter_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            jotter_core::Error::Database(_) if err.is_constraint_violation() => {
                ApiError::BadRequest(err.to_string())
            }
            _ => ApiError::Internal(err),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(
                subsystem = "api",
                status = status.as_u16(),
                error = %message,
                "Request failed"
            );
        } else {
            debug!(
                subsystem = "api",
                status = status.as_u16(),
                error = %message,
                "Request rejected"
            );
        }

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
