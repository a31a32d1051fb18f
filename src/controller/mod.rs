// src/controller/mod.rs

use crate::artifact::{ArtifactLauncher, HttpDownloader};
use crate::config::ClientConfig;
use crate::decoder::{decode, error_detail};
use crate::error::ClientError;
use crate::protocol::{ProjectResult, ResponseShape, SubmissionState};
use crate::transport::{HttpTransport, Transport};
use crate::validation::Brief;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

type Outcome = Result<ProjectResult, ClientError>;

/// What `submit` did with the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// A request is now in flight.
    Accepted,
    /// A submission is already pending; the affordance is disabled.
    Busy,
}

struct Inflight {
    sequence: u64,
    outcome: Receiver<Outcome>,
}

/// Owns the submission state machine for one session.
///
/// `Idle -> Pending -> {Succeeded, Failed}`, and both outcomes may go back
/// to `Pending` on the next submit. The request runs on a worker thread;
/// its outcome is applied by `poll` or `wait` on the caller's thread, so the
/// state has exactly one writer.
pub struct SubmissionController {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    launcher: Arc<dyn ArtifactLauncher>,
    state: SubmissionState,
    notice: Option<String>,
    sequence: u64,
    inflight: Option<Inflight>,
}

impl SubmissionController {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        launcher: Arc<dyn ArtifactLauncher>,
    ) -> Self {
        Self {
            config,
            transport,
            launcher,
            state: SubmissionState::Idle,
            notice: None,
            sequence: 0,
            inflight: None,
        }
    }

    /// Controller wired to the real service.
    pub fn http(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new()?;
        let launcher = HttpDownloader::new(config.download_dir.clone())?;
        Ok(Self::new(config, Arc::new(transport), Arc::new(launcher)))
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Validation notice from the last rejected submit, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether the submit affordance is enabled.
    pub fn can_submit(&self) -> bool {
        !self.state.is_pending()
    }

    /// Validates `input` and, if it is a real brief, issues exactly one
    /// request. Blank input never reaches the transport and leaves the
    /// state untouched.
    pub fn submit(&mut self, input: &str) -> Result<Admission, ClientError> {
        if !self.can_submit() {
            tracing::debug!(sequence = self.sequence, "submit ignored while pending");
            return Ok(Admission::Busy);
        }

        let brief = match Brief::parse(input) {
            Ok(brief) => brief,
            Err(e) => {
                tracing::warn!("rejected blank brief");
                self.notice = Some(e.user_message());
                return Err(e);
            }
        };

        self.notice = None;
        self.sequence += 1;
        let sequence = self.sequence;
        let (tx, rx) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        let url = self.config.submit_url();
        let shape = self.config.shape;

        tracing::info!(sequence, url = %url, transport = transport.name(), "submitting brief");
        self.state = SubmissionState::Pending;

        let spawned = thread::Builder::new()
            .name(format!("brief-submit-{sequence}"))
            .spawn(move || {
                let outcome = run_submission(transport.as_ref(), &url, shape, &brief);
                // The controller may have been dropped; nobody to tell.
                let _ = tx.send(outcome);
            });

        match spawned {
            Ok(_) => {
                self.inflight = Some(Inflight {
                    sequence,
                    outcome: rx,
                });
            }
            Err(e) => {
                self.finish(
                    sequence,
                    Err(ClientError::Transport(format!("Failed to start request: {e}"))),
                );
            }
        }

        Ok(Admission::Accepted)
    }

    /// Applies the pending outcome if it has arrived. Returns `true` when
    /// the state changed.
    pub fn poll(&mut self) -> bool {
        let Some(inflight) = &self.inflight else {
            return false;
        };

        let outcome = match inflight.outcome.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(worker_lost()),
        };

        let sequence = inflight.sequence;
        self.inflight = None;
        self.finish(sequence, outcome);
        true
    }

    /// Blocks until the pending submission settles. No-op when nothing is
    /// in flight. There is no timeout: a hung request blocks here.
    pub fn wait(&mut self) -> &SubmissionState {
        if let Some(inflight) = self.inflight.take() {
            let outcome = inflight.outcome.recv().unwrap_or_else(|_| Err(worker_lost()));
            self.finish(inflight.sequence, outcome);
        }
        &self.state
    }

    /// Requests the packaged artifact for the current result.
    ///
    /// Only meaningful in `Succeeded`, and only when the result names a
    /// directory; otherwise nothing happens.
    pub fn retrieve_artifact(&self) {
        let SubmissionState::Succeeded(result) = &self.state else {
            tracing::debug!(state = self.state.label(), "no result to retrieve");
            return;
        };

        let reference = result.artifact_reference();
        if reference.is_empty() {
            tracing::debug!("result carries no artifact directory");
            return;
        }

        let url = match self.config.download_url(reference.as_str()) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(%reference, error = %e, "cannot build artifact URL");
                return;
            }
        };
        tracing::info!(url = %url, %reference, "retrieving artifact");
        self.launcher.launch(&url, &reference);
    }

    fn finish(&mut self, sequence: u64, outcome: Outcome) {
        if sequence != self.sequence {
            tracing::debug!(sequence, current = self.sequence, "discarding superseded outcome");
            return;
        }
        self.state = match outcome {
            Ok(result) => {
                tracing::info!(sequence, tasks = result.tasks.len(), "submission succeeded");
                SubmissionState::Succeeded(result)
            }
            Err(e) => {
                tracing::warn!(sequence, error = %e, "submission failed");
                SubmissionState::Failed(e.user_message())
            }
        };
    }
}

fn worker_lost() -> ClientError {
    ClientError::Transport("submission worker exited without reporting".into())
}

/// One request, classified: transport failure, service error, or a decoded
/// result (which may itself fail to decode).
pub fn run_submission(
    transport: &dyn Transport,
    url: &str,
    shape: ResponseShape,
    brief: &Brief,
) -> Result<ProjectResult, ClientError> {
    let reply = transport.post_brief(url, brief)?;

    if !reply.is_success() {
        return Err(ClientError::Service {
            status: reply.status,
            detail: error_detail(&reply.body),
        });
    }

    decode(shape, &reply.body)
}
