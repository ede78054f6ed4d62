//! # Nexus Fetcher
//!
//! Network edge of the activity harvester: the authenticated GitHub
//! contents-API client, base64 payload decoding, the topic-manifest repair
//! shim, and the file-name/URL resolver that derives an application's
//! identity from a contents-API file descriptor.
//!
//! Everything recoverable is reported as a [`nexus_protocol::FetchFailure`]
//! value rather than an error; only client construction can fail hard.

mod client;
pub mod contents;
mod error;
mod memory;
pub mod repair;
pub mod resolver;

pub use client::{ContentFetcher, FetchOutcome, GitHubContentClient, DEFAULT_TIMEOUT_MS};
pub use error::{FetcherError, Result};
pub use memory::StaticContentFetcher;
pub use resolver::{resolve_app_identity, resolve_relative_url, AppIdentity, ManifestKind};
