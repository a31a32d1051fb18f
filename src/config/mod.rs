// src/config/mod.rs

use crate::error::ClientError;
use crate::protocol::ResponseShape;
use reqwest::Url;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const FLAT_ENDPOINT: &str = "/api/brief";
pub const WRAPPED_ENDPOINT: &str = "/api/brief/";
pub const DOWNLOAD_PATH: &str = "/api/brief/download";

/// Where the generation service lives and how to talk to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub shape: ResponseShape,
    pub download_dir: PathBuf,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            shape: ResponseShape::Flat,
            download_dir: PathBuf::from("."),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').into();
        self
    }

    pub fn with_shape(mut self, shape: ResponseShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Submission URL for the configured response shape.
    pub fn submit_url(&self) -> String {
        let endpoint = match self.shape {
            ResponseShape::Flat => FLAT_ENDPOINT,
            ResponseShape::Wrapped => WRAPPED_ENDPOINT,
        };
        format!("{}{}", self.base_url, endpoint)
    }

    /// Download URL for an artifact. The reference is pushed as a single
    /// percent-encoded path segment, so `#`, `?` or `%` stay in the path.
    pub fn download_url(&self, reference: &str) -> Result<String, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("base URL {} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(DOWNLOAD_PATH.trim_start_matches('/').split('/'))
            .push(reference);
        Ok(url.to_string())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_follows_shape() {
        let flat = ClientConfig::new();
        assert_eq!(flat.submit_url(), "http://127.0.0.1:8000/api/brief");

        let wrapped = ClientConfig::new().with_shape(ResponseShape::Wrapped);
        assert_eq!(wrapped.submit_url(), "http://127.0.0.1:8000/api/brief/");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let config = ClientConfig::new().with_base_url("http://localhost:9000/");
        assert_eq!(
            config.download_url("movie-app").unwrap(),
            "http://localhost:9000/api/brief/download/movie-app"
        );
    }

    #[test]
    fn download_reference_is_one_encoded_segment() {
        let config = ClientConfig::new();
        assert_eq!(
            config.download_url("notes#1?draft").unwrap(),
            "http://127.0.0.1:8000/api/brief/download/notes%231%3Fdraft"
        );
    }

    #[test]
    fn unparseable_base_url_is_a_config_error() {
        let config = ClientConfig::new().with_base_url("not a url");
        assert!(matches!(
            config.download_url("movie-app"),
            Err(ClientError::Config(_))
        ));
    }
}
