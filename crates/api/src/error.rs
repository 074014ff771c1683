//! Error taxonomy for list fetches and exports.
//!
//! Every failure is reduced to one human-readable string before it reaches the
//! user. Cancellation is not a failure and has no message.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

pub const MSG_UNAUTHORIZED: &str = "Unauthorized. Please log in.";
pub const MSG_FORBIDDEN: &str = "Access denied. Please contact your administrator.";
pub const MSG_TIMEOUT: &str = "Request timed out. Please try again later.";
pub const MSG_GENERIC: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ApiError {
    /// Superseded or torn down; never shown to the user.
    #[error("cancelled")]
    Cancelled,
    #[error("timeout")]
    Timeout,
    #[error("status {status}: {}", .message.as_deref().unwrap_or("-"))]
    Status { status: u16, message: Option<String> },
    #[error("transport: {0}")]
    Transport(String),
    #[error("decode: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Build a status error, lifting `message` (or `error`) out of the body.
    pub fn from_status(status: u16, body: &serde_json::Value) -> Self {
        Self::Status { status, message: body_message(body) }
    }

    pub fn is_cancelled(&self) -> bool { matches!(self, ApiError::Cancelled) }

    /// Message for the error-reporting collaborator. `None` for cancellation.
    pub fn user_message(&self) -> Option<String> {
        let msg = match self {
            ApiError::Cancelled => return None,
            ApiError::Status { status: 401, .. } => MSG_UNAUTHORIZED.to_string(),
            ApiError::Status { status: 403, .. } => MSG_FORBIDDEN.to_string(),
            ApiError::Timeout => MSG_TIMEOUT.to_string(),
            ApiError::Status { message: Some(m), .. } => m.clone(),
            ApiError::Status { message: None, .. } | ApiError::Transport(_) | ApiError::Decode(_) => {
                MSG_GENERIC.to_string()
            }
        };
        Some(msg)
    }
}

fn body_message(body: &serde_json::Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .filter_map(|k| body.get(*k))
        .find_map(|v| match v {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            serde_json::Value::Object(o) => o.get("message").and_then(|m| m.as_str()).map(|s| s.to_string()),
            _ => None,
        })
}
