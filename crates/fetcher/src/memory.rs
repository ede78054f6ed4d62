use crate::{ContentFetcher, FetchOutcome};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use nexus_protocol::{ContentsEnvelope, FailureKind};
use std::collections::HashMap;
use std::sync::Mutex;

/// Fixture-backed fetcher.
///
/// Serves registered envelopes from memory and answers 404 for everything
/// else, while recording every requested URL so tests can assert the
/// attempt order of the two-phase locator.
#[derive(Default)]
pub struct StaticContentFetcher {
    responses: HashMap<String, ContentsEnvelope>,
    requests: Mutex<Vec<String>>,
}

impl StaticContentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file at `url`, exposing `name` and `file_url` in the
    /// envelope and `body` base64-encoded the way the contents API serves
    /// it.
    pub fn insert(&mut self, url: &str, name: &str, file_url: &str, body: &str) {
        self.insert_envelope(
            url,
            ContentsEnvelope {
                name: name.to_string(),
                url: file_url.to_string(),
                content: BASE64.encode(body),
                encoding: "base64".to_string(),
            },
        );
    }

    pub fn insert_envelope(&mut self, url: &str, envelope: ContentsEnvelope) {
        self.responses.insert(url.to_string(), envelope);
    }

    /// Every URL requested so far, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }
}

#[async_trait]
impl ContentFetcher for StaticContentFetcher {
    async fn fetch_contents(&self, url: &str) -> FetchOutcome {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(url.to_string());

        match self.responses.get(url) {
            Some(envelope) => FetchOutcome::Success(envelope.clone()),
            None => FetchOutcome::failure(
                url,
                FailureKind::Http { status: 404 },
                "HTTP error! status: 404 Not Found",
            ),
        }
    }
}
