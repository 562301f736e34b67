//! HTTP error handling for the dev tag store
//!
//! Every error leaves the server as a JSON body, so the reachability resolver
//! treats it as a real answer from a tag store rather than "not this one".

use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON error body `{ message, code, details? }`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "TAG_NOT_FOUND" | "PARENT_NOT_FOUND" => StatusCode::NOT_FOUND,
            "CYCLIC_REPARENT" | "DUPLICATE_SIBLING" => StatusCode::CONFLICT,
            "EMPTY_NAME" | "TERTIARY_PARENT" | "DEPTH_EXCEEDED" => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            "INVALID_INPUT" => StatusCode::BAD_REQUEST,
            "UPSTREAM_UNREACHABLE" | "UPSTREAM_REJECTED" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<StoreError> for HttpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UpstreamRejected { status, body } => {
                let message = body.get("message").and_then(Value::as_str);
                let code = body.get("code").and_then(Value::as_str);
                match (message, code) {
                    (Some(message), Some(code)) => HttpError::new(message, code),
                    _ => HttpError::with_details(
                        format!("Tag store rejected the request with status {}", status),
                        "UPSTREAM_REJECTED",
                        body.to_string(),
                    ),
                }
            }
            StoreError::UpstreamUnreachable(err) => {
                HttpError::new(err.to_string(), "UPSTREAM_UNREACHABLE")
            }
            other => HttpError::with_details(
                other.to_string(),
                "INTERNAL_ERROR",
                format!("{:?}", other),
            ),
        }
    }
}
