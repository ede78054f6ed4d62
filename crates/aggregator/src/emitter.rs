use crate::Result;
use chrono::{DateTime, Utc};
use nexus_protocol::{ActivityStub, SearchImportRecord};
use std::path::{Path, PathBuf};

const TOPIC_DOCUMENT_FILE_NAME: &str = "dbp-nexus.topic.metadata.json.ejs";

// The combined topic document is templated text, not serializer output: the
// consumed format is an `.ejs` near-JSON file whose shape (indentation,
// `",\n "` joiner) is pinned by the production consumers.
const TOPIC_DOCUMENT_TEMPLATE: &str = r#"{
            "name": {
                "de": "Nexus",
                "en": "Nexus"
            },
            "short_name": {
                "de": "Nexus-Aktivitätensuche",
                "en": "Nexus Activity Finder"
            },
            "description": {
                "de": "Diese Anwendung ermöglicht es Ihnen, nach DBP-Aktivitäten zu suchen.",
                "en": "This application enables you to search DBP activities."
            },
            "routing_name": "nexus",
            "activities": [
                __ACTIVITIES__
            ],
            "attributes": []
            }
        "#;

/// Render the combined topic document for the de-duplicated stub set.
pub fn render_topic_document(stubs: &[ActivityStub]) -> Result<String> {
    let entries = stubs
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(TOPIC_DOCUMENT_TEMPLATE.replace("__ACTIVITIES__", &entries.join(",\n ")))
}

fn timestamp_slug(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-")
}

/// `fetch-results-<ISO8601 with ':' and '.' replaced by '-'>.json`
pub fn search_import_file_name(now: DateTime<Utc>) -> String {
    format!("fetch-results-{}.json", timestamp_slug(now))
}

/// Write the topic document under its fixed file name.
pub async fn write_topic_document(dir: &Path, stubs: &[ActivityStub]) -> Result<PathBuf> {
    let rendered = render_topic_document(stubs)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(TOPIC_DOCUMENT_FILE_NAME);
    tokio::fs::write(&path, rendered).await?;
    log::info!("wrote topic document {}", path.display());
    Ok(path)
}

/// Write the search-import file under a timestamped name.
pub async fn write_search_import(dir: &Path, records: &[SearchImportRecord]) -> Result<PathBuf> {
    let bytes = serde_json::to_vec_pretty(records)?;
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(search_import_file_name(Utc::now()));
    tokio::fs::write(&path, bytes).await?;
    log::info!("wrote search import {}", path.display());
    Ok(path)
}

#[derive(Debug, Clone)]
pub struct WrittenArtifacts {
    pub topic_path: PathBuf,
    pub search_path: PathBuf,
}

/// Write both artifacts. The writes are independent: a failure of one does
/// not prevent attempting the other, though either failure makes the run
/// fatal afterwards.
pub async fn write_artifacts(
    topic_dir: &Path,
    data_dir: &Path,
    stubs: &[ActivityStub],
    records: &[SearchImportRecord],
) -> Result<WrittenArtifacts> {
    let topic = write_topic_document(topic_dir, stubs).await;
    let search = write_search_import(data_dir, records).await;

    if let Err(err) = &topic {
        log::error!("failed to write topic document: {err}");
    }
    if let Err(err) = &search {
        log::error!("failed to write search import: {err}");
    }

    Ok(WrittenArtifacts {
        topic_path: topic?,
        search_path: search?,
    })
}
