use crate::{dedup, emitter, locator, AggregatorError, Result};
use chrono::Utc;
use nexus_fetcher::{contents, resolver, ContentFetcher, FetchOutcome, ManifestKind};
use nexus_protocol::{
    FetchFailure, HarvestReport, SearchImportRecord, SourceRef, TaggedManifest,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_data_output_dir() -> PathBuf {
    PathBuf::from("typesense-data")
}

fn default_topic_output_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_timeout_ms() -> u64 {
    nexus_fetcher::DEFAULT_TIMEOUT_MS
}

/// Validated configuration for one harvest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub sources: Vec<SourceRef>,
    #[serde(default = "default_data_output_dir")]
    pub data_output_dir: PathBuf,
    #[serde(default = "default_topic_output_dir")]
    pub topic_output_dir: PathBuf,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Fetch and merge but skip the artifact writes.
    #[serde(default)]
    pub dry_run: bool,
}

impl HarvestConfig {
    pub fn with_sources(sources: Vec<SourceRef>) -> Self {
        Self {
            sources,
            data_output_dir: default_data_output_dir(),
            topic_output_dir: default_topic_output_dir(),
            timeout_ms: default_timeout_ms(),
            dry_run: false,
        }
    }

    /// Sources in processing order: ascending rank, ties broken by
    /// configuration order (stable sort). Later sources win
    /// de-duplication collisions.
    pub fn ordered_sources(&self) -> Vec<SourceRef> {
        let mut sources = self.sources.clone();
        sources.sort_by_key(|source| source.rank);
        sources
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(AggregatorError::InvalidConfig(
                "source list is empty".into(),
            ));
        }
        if let Some(source) = self.sources.iter().find(|source| source.url.trim().is_empty()) {
            return Err(AggregatorError::InvalidConfig(format!(
                "source with rank {} has an empty URL",
                source.rank
            )));
        }
        if self.timeout_ms == 0 {
            return Err(AggregatorError::InvalidConfig("timeout_ms is zero".into()));
        }
        Ok(())
    }
}

/// Run the full harvest: fetch every topic manifest, merge and de-duplicate
/// their activities, locate each activity's metadata file, and emit the two
/// artifacts.
///
/// Per-URL failures never abort the batch; they are collected in the
/// returned report. Only configuration and artifact I/O errors are `Err`.
pub async fn run(config: &HarvestConfig, fetcher: &dyn ContentFetcher) -> Result<HarvestReport> {
    config.validate()?;

    let mut report = HarvestReport {
        timestamp: Utc::now().to_rfc3339(),
        ..HarvestReport::default()
    };

    let sources = config.ordered_sources();
    report.sources_total = sources.len();

    let mut manifests: Vec<TaggedManifest> = Vec::new();
    for source in &sources {
        log::info!("fetching topic manifest {}", source.url);
        match fetch_topic_manifest(fetcher, &source.url).await {
            Ok(tagged) => {
                log::debug!(
                    "{}: {} activities",
                    tagged.app_name,
                    tagged.manifest.activities.len()
                );
                report.sources_fetched += 1;
                manifests.push(tagged);
            }
            Err(failure) => {
                log::warn!("source {} failed: {}", failure.url, failure.message);
                report.failures.push(failure);
            }
        }
    }

    let stubs = dedup::merge_activities(&manifests);
    report.activities_discovered = stubs.len();
    log::info!(
        "merged {} manifests into {} unique activities",
        manifests.len(),
        stubs.len()
    );

    let mut located = Vec::new();
    for stub in stubs.iter() {
        match locator::locate_activity(fetcher, stub).await {
            locator::LocateResult::Found(activity) => located.push(*activity),
            locator::LocateResult::Exhausted(warning) => report.locate_warnings.push(warning),
        }
    }
    report.activities_resolved = located.len();

    let records: Vec<SearchImportRecord> = located
        .iter()
        .map(|activity| SearchImportRecord::project(&activity.stub.path, &activity.metadata))
        .collect();

    if config.dry_run {
        log::info!("dry run: skipping artifact writes");
        return Ok(report);
    }

    let written = emitter::write_artifacts(
        &config.topic_output_dir,
        &config.data_output_dir,
        &stubs.into_vec(),
        &records,
    )
    .await?;
    report.topic_artifact = Some(written.topic_path.display().to_string());
    report.search_artifact = Some(written.search_path.display().to_string());

    Ok(report)
}

async fn fetch_topic_manifest(
    fetcher: &dyn ContentFetcher,
    url: &str,
) -> std::result::Result<TaggedManifest, FetchFailure> {
    let envelope = match fetcher.fetch_contents(url).await {
        FetchOutcome::Success(envelope) => envelope,
        FetchOutcome::Failure(failure) => return Err(failure),
    };

    let identity = resolver::resolve_app_identity(&envelope.name, &envelope.url, ManifestKind::Topic);
    let text = contents::decode_text(url, &envelope)?;
    let manifest = contents::parse_topic_manifest(url, &text)?;

    Ok(TaggedManifest {
        manifest,
        app_name: identity.app_name,
        app_git_url: identity.app_git_url,
    })
}
