//! Management API response envelope.

use crate::error::RouterError;
use serde::Serialize;
use serde_json::Value;

/// Outcome marker of an API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    /// The operation succeeded.
    Ok,
    /// The operation failed; `code` names the error.
    Error,
}

/// Response document returned to the transport.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    /// Success or failure.
    pub status: ApiStatus,
    /// Human-readable description of the outcome.
    pub message: String,
    /// Stable error code, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Operation payload, e.g. the route listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    /// A successful response with no payload.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Ok,
            message: message.into(),
            code: None,
            data: None,
        }
    }

    /// A successful response carrying a payload.
    pub fn with_data(message: impl Into<String>, data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok(message)
        }
    }

    /// A failure response carrying the error's code and message.
    pub fn error(err: &RouterError) -> Self {
        Self {
            status: ApiStatus::Error,
            message: err.to_string(),
            code: Some(err.code()),
            data: None,
        }
    }

    /// Returns whether this is a success response.
    pub fn is_ok(&self) -> bool {
        self.status == ApiStatus::Ok
    }
}
