//! Response envelope shared by every endpoint.
//!
//! Success: `{success: true, statusCode, data, message}`.
//! Failure: `{success: false, statusCode, message}`, with an error detail
//! field included only when the server runs in development mode.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Success envelope wrapping endpoint data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Builds a success envelope for the given status.
    pub fn new(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            data,
            message: message.into(),
        }
    }

    /// Renders the envelope with its embedded status code.
    pub fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Failure envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    /// Error detail, present only in development mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ApiFailure {
    /// Builds a failure envelope.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: status.as_u16(),
            message: message.into(),
            stack: None,
        }
    }

    /// Attaches an error detail when `development` is set.
    pub fn with_stack(mut self, development: bool, detail: impl Into<String>) -> Self {
        if development {
            self.stack = Some(detail.into());
        }
        self
    }

    /// Renders the envelope with its embedded status code.
    pub fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
