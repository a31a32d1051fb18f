// src/error.rs

use thiserror::Error;

pub const VALIDATION_MESSAGE: &str = "Please enter a project brief!";
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";
pub const DECODE_ERROR_MESSAGE: &str = "Malformed response from generation service";

/// Everything that can go wrong between a typed brief and a rendered plan.
///
/// None of these are fatal: the controller always lands back in an
/// interactive state and the user can submit again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Blank brief, rejected before any request is made.
    #[error("brief is empty")]
    Validation,

    /// The request never completed (connection refused, reset, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success status. `detail` is the server's own message, if it sent one.
    #[error("service returned {status}: {}", .detail.as_deref().unwrap_or(UNKNOWN_ERROR_MESSAGE))]
    Service { status: u16, detail: Option<String> },

    /// Client-side settings that cannot form a request, e.g. a bad base URL.
    #[error("configuration error: {0}")]
    Config(String),

    /// Success status but the payload did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    /// Single-line text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation => VALIDATION_MESSAGE.to_string(),
            ClientError::Service {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ClientError::Service { detail: None, .. }
            | ClientError::Transport(_)
            | ClientError::Config(_) => {
                UNKNOWN_ERROR_MESSAGE.to_string()
            }
            ClientError::Decode(_) => DECODE_ERROR_MESSAGE.to_string(),
        }
    }
}
