use crate::Result;
use async_trait::async_trait;
use nexus_protocol::{ContentsEnvelope, FailureKind, FetchFailure};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use std::time::Duration;

/// Per-request timeout. The URL volume is small and there are no retries,
/// so a slow source should fail fast instead of stalling the batch.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const HARVESTER_USER_AGENT: &str = concat!("nexus-harvester/", env!("CARGO_PKG_VERSION"));

/// Outcome of a single contents-API fetch.
///
/// Failures are values, never raised: one bad source cannot abort a batch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success(ContentsEnvelope),
    Failure(FetchFailure),
}

impl FetchOutcome {
    pub fn failure(url: &str, kind: FailureKind, message: impl Into<String>) -> Self {
        FetchOutcome::Failure(FetchFailure::new(url, kind, message))
    }
}

/// Seam between the pipeline and the network.
///
/// Production uses [`GitHubContentClient`]; tests substitute the in-memory
/// [`crate::StaticContentFetcher`].
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Fetch one contents-API file descriptor. Single attempt, no retries.
    async fn fetch_contents(&self, url: &str) -> FetchOutcome;
}

/// Authenticated client for the GitHub contents API.
pub struct GitHubContentClient {
    client: reqwest::Client,
}

impl GitHubContentClient {
    pub fn new(token: &str, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("token {token}"))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static(HARVESTER_USER_AGENT));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for GitHubContentClient {
    async fn fetch_contents(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                return FetchOutcome::failure(url, FailureKind::Transport, err.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome::failure(
                url,
                FailureKind::Http {
                    status: status.as_u16(),
                },
                format!("HTTP error! status: {status}"),
            );
        }

        match response.json::<ContentsEnvelope>().await {
            Ok(envelope) => FetchOutcome::Success(envelope),
            Err(err) => FetchOutcome::failure(url, FailureKind::Parse, err.to_string()),
        }
    }
}
