// src/transport/scripted.rs

use crate::error::ClientError;
use crate::transport::{HttpReply, Transport};
use crate::validation::Brief;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

/// Replays canned replies instead of talking to a server. Backs the
/// binary's `--dry-run` mode and the controller tests.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpReply, ClientError>>>,
    repeat: Option<HttpReply>,
    requests: Mutex<Vec<String>>,
    gate: Option<Mutex<Receiver<()>>>,
}

/// Releases requests held by a gated `ScriptedTransport`, one per `open`.
/// Dropping the gate releases everything still waiting.
pub struct TransportGate(Sender<()>);

impl TransportGate {
    pub fn open(&self) {
        let _ = self.0.send(());
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            repeat: None,
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Every request gets the same reply.
    pub fn repeating(reply: HttpReply) -> Self {
        Self {
            repeat: Some(reply),
            ..Self::new()
        }
    }

    /// Requests block inside `post_brief` until the returned gate opens.
    pub fn gated() -> (Self, TransportGate) {
        let (tx, rx) = mpsc::channel();
        let transport = Self {
            gate: Some(Mutex::new(rx)),
            ..Self::new()
        };
        (transport, TransportGate(tx))
    }

    pub fn reply(self, reply: HttpReply) -> Self {
        self.push(Ok(reply));
        self
    }

    pub fn fail(self, error: ClientError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, outcome: Result<HttpReply, ClientError>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(outcome);
        }
    }

    /// Briefs received so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self) -> Result<HttpReply, ClientError> {
        let scripted = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());

        match (scripted, &self.repeat) {
            (Some(outcome), _) => outcome,
            (None, Some(reply)) => Ok(reply.clone()),
            (None, None) => Err(ClientError::Transport("no scripted reply left".into())),
        }
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    fn post_brief(&self, url: &str, brief: &Brief) -> Result<HttpReply, ClientError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(brief.as_str().to_string());
        }
        tracing::debug!(url, "scripted transport received brief");

        if let Some(gate) = &self.gate {
            if let Ok(rx) = gate.lock() {
                let _ = rx.recv();
            }
        }

        self.next_reply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_in_order_then_runs_dry() {
        let transport = ScriptedTransport::new()
            .reply(HttpReply::ok("first"))
            .fail(ClientError::Transport("refused".into()));
        let brief = Brief::parse("anything").unwrap();

        assert_eq!(
            transport.post_brief("u", &brief).unwrap().body,
            b"first".to_vec()
        );
        assert!(transport.post_brief("u", &brief).is_err());
        assert!(matches!(
            transport.post_brief("u", &brief),
            Err(ClientError::Transport(_))
        ));
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn repeating_never_runs_dry() {
        let transport = ScriptedTransport::repeating(HttpReply::ok("same"));
        let brief = Brief::parse("anything").unwrap();
        for _ in 0..3 {
            assert_eq!(transport.post_brief("u", &brief).unwrap().body, b"same".to_vec());
        }
    }
}
