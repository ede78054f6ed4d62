use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetcherError>;

/// Fatal fetcher errors.
///
/// Per-URL problems are *not* represented here; those become
/// [`nexus_protocol::FetchFailure`] values so the batch keeps going.
#[derive(Error, Debug)]
pub enum FetcherError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid authorization header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}
