// src/transport/http.rs

use crate::error::ClientError;
use crate::transport::{HttpReply, Transport};
use crate::validation::Brief;
use reqwest::blocking::Client;
use serde_json::json;

/// Blocking reqwest transport. One attempt per call, no timeout.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    fn post_brief(&self, url: &str, brief: &Brief) -> Result<HttpReply, ClientError> {
        let payload = json!({ "brief": brief.as_str() });

        tracing::debug!(url, "posting brief");
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    ClientError::Transport(format!("Connection failed: {e}"))
                } else {
                    ClientError::Transport(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| ClientError::Transport(format!("Failed to read response body: {e}")))?;

        tracing::debug!(url, status, bytes = body.len(), "generation service replied");
        Ok(HttpReply {
            status,
            body: body.to_vec(),
        })
    }
}
