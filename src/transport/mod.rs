// src/transport/mod.rs

use crate::error::ClientError;
use crate::validation::Brief;

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: u16, body: &[u8]) -> Self {
        Self {
            status,
            body: body.to_vec(),
        }
    }

    pub fn ok(body: &str) -> Self {
        Self::new(200, body.as_bytes())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a brief to the generation service.
///
/// Implementations return `Ok` for any completed exchange, whatever the
/// status, and `Err(ClientError::Transport)` only when no reply arrived.
/// Classifying the status is the controller's job.
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;
    fn post_brief(&self, url: &str, brief: &Brief) -> Result<HttpReply, ClientError>;
}

pub mod http;
pub mod scripted;

pub use http::HttpTransport;
pub use scripted::{ScriptedTransport, TransportGate};
