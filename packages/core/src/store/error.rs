//! Tag Store Error Types

use crate::upstream::{TransportError, UpstreamError};
use serde_json::{json, Value};
use thiserror::Error;

/// Tag store operation errors
///
/// Store-side rejections keep the store's own status and body so callers can
/// see exactly what the store said.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No candidate instance produced a qualifying response
    #[error(transparent)]
    UpstreamUnreachable(#[from] UpstreamError),

    /// The store answered but refused the request
    #[error("Tag store rejected the request with status {status}: {body}")]
    UpstreamRejected { status: u16, body: Value },

    /// The store answered with a body that does not have the expected shape
    #[error("Tag store returned an invalid response: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be set up
    #[error("Failed to initialize tag store client: {0}")]
    ClientInit(#[from] TransportError),

    /// Payload (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a rejection carrying a `{message, code}` body
    pub fn rejected(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UpstreamRejected {
            status,
            body: json!({
                "message": message.into(),
                "code": code.into(),
            }),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// HTTP status of a rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `code` field of a rejection body, when the store sent one
    pub fn rejection_code(&self) -> Option<&str> {
        match self {
            Self::UpstreamRejected { body, .. } => body.get("code").and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::UpstreamUnreachable(_))
    }
}
