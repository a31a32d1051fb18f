// src/artifact/mod.rs

use crate::error::ClientError;
use crate::resolver::ArtifactReference;
use reqwest::blocking::Client;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread::{self, JoinHandle};

/// Starts retrieval of a packaged artifact.
///
/// Fire-and-forget: `launch` returns immediately and its outcome never
/// flows back into the submission state.
pub trait ArtifactLauncher: Send + Sync {
    fn launch(&self, url: &str, reference: &ArtifactReference);
}

/// Downloads `<url>` into `<dir>/<reference>.zip` on a background thread.
///
/// The archive is written to a temp file in `dir` and renamed into place,
/// so `<reference>.zip` is either complete or absent. Dropping the
/// downloader waits for transfers still running.
pub struct HttpDownloader {
    client: Client,
    dir: PathBuf,
    transfers: Mutex<Vec<JoinHandle<()>>>,
}

impl HttpDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            dir: dir.into(),
            transfers: Mutex::new(Vec::new()),
        })
    }

    pub fn download(&self, url: &str, reference: &ArtifactReference) -> Result<PathBuf, ClientError> {
        fetch_archive(&self.client, url, &self.dir, reference)
    }
}

impl ArtifactLauncher for HttpDownloader {
    fn launch(&self, url: &str, reference: &ArtifactReference) {
        let client = self.client.clone();
        let dir = self.dir.clone();
        let url = url.to_string();
        let reference = reference.clone();

        let spawned = thread::Builder::new()
            .name(format!("artifact-{reference}"))
            .spawn(move || match fetch_archive(&client, &url, &dir, &reference) {
                Ok(path) => tracing::info!(path = %path.display(), "artifact saved"),
                Err(e) => tracing::warn!(%reference, error = %e, "artifact retrieval failed"),
            });

        match spawned {
            Ok(handle) => {
                if let Ok(mut transfers) = self.transfers.lock() {
                    transfers.retain(|transfer| !transfer.is_finished());
                    transfers.push(handle);
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not start artifact retrieval"),
        }
    }
}

impl Drop for HttpDownloader {
    fn drop(&mut self) {
        let transfers = match self.transfers.get_mut() {
            Ok(transfers) => std::mem::take(transfers),
            Err(poisoned) => std::mem::take(poisoned.into_inner()),
        };
        if !transfers.is_empty() {
            tracing::info!(count = transfers.len(), "waiting for artifact transfers");
        }
        for transfer in transfers {
            if transfer.join().is_err() {
                tracing::warn!("artifact transfer thread panicked");
            }
        }
    }
}

fn fetch_archive(
    client: &Client,
    url: &str,
    dir: &Path,
    reference: &ArtifactReference,
) -> Result<PathBuf, ClientError> {
    tracing::debug!(url, "retrieving artifact");
    let response = client
        .get(url)
        .send()
        .map_err(|e| ClientError::Transport(format!("Request failed: {e}")))?;

    let status = response.status().as_u16();
    let body = response
        .bytes()
        .map_err(|e| ClientError::Transport(format!("Failed to read archive: {e}")))?;

    if !(200..300).contains(&status) {
        return Err(ClientError::Service {
            status,
            detail: crate::decoder::error_detail(&body),
        });
    }

    let path = dir.join(format!("{reference}.zip"));
    let write_failed =
        |e: std::io::Error| ClientError::Transport(format!("Failed to write {}: {e}", path.display()));

    let mut staged = tempfile::Builder::new()
        .prefix(&format!(".{reference}"))
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(write_failed)?;
    staged.write_all(&body).map_err(write_failed)?;
    staged.as_file().sync_all().map_err(write_failed)?;
    staged.persist(&path).map_err(|e| write_failed(e.error))?;
    Ok(path)
}

/// Remembers requested URLs instead of fetching them.
#[derive(Default)]
pub struct RecordingLauncher {
    launched: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> Vec<String> {
        self.launched
            .lock()
            .map(|urls| urls.clone())
            .unwrap_or_default()
    }
}

impl ArtifactLauncher for RecordingLauncher {
    fn launch(&self, url: &str, reference: &ArtifactReference) {
        tracing::info!(url, %reference, "artifact retrieval recorded");
        if let Ok(mut urls) = self.launched.lock() {
            urls.push(url.to_string());
        }
    }
}
