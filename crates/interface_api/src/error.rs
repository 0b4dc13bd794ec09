//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use core_kernel::CadError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Cad(#[from] CadError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Cad(err) => match err {
                CadError::Configuration { .. } | CadError::Validation { .. } | CadError::Routing { .. } => {
                    StatusCode::BAD_REQUEST
                }
                CadError::Authentication { .. } | CadError::SessionNotFound { .. } => StatusCode::UNAUTHORIZED,
                CadError::UnsupportedOperation { .. } => StatusCode::NOT_IMPLEMENTED,
                CadError::NotFound { .. } => StatusCode::NOT_FOUND,
                CadError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                CadError::Vendor { .. } => StatusCode::BAD_GATEWAY,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::Cad(err) => match err {
                CadError::Configuration { .. } => "configuration_error",
                CadError::Validation { .. } => "validation_error",
                CadError::Routing { .. } => "routing_error",
                CadError::Authentication { .. } => "authentication_error",
                CadError::SessionNotFound { .. } => "session_not_found",
                CadError::UnsupportedOperation { .. } => "unsupported_operation",
                CadError::NotFound { .. } => "not_found",
                CadError::Timeout { .. } => "timeout",
                CadError::Vendor { .. } => "vendor_error",
            },
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.error_type().to_string(),
            code: match &self {
                ApiError::Cad(err) => Some(err.code().to_string()),
                ApiError::Internal(_) => None,
            },
            message: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}
