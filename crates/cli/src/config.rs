use anyhow::{Context as AnyhowContext, Result};
use nexus_aggregator::HarvestConfig;
use nexus_protocol::SourceRef;
use std::path::Path;

/// The production source list, in merge order.
///
/// Ranks are spaced so a new application can be slotted between two
/// existing ones without renumbering. lunchlottery keeps its topic
/// metadata under `src/` and without the `.ejs` template suffix.
pub fn production_sources() -> Vec<SourceRef> {
    const SOURCES: &[(u32, &str)] = &[
        (
            10,
            "https://api.github.com/repos/digital-blueprint/cabinet-app/contents/assets/dbp-cabinet.topic.metadata.json.ejs",
        ),
        (
            20,
            "https://api.github.com/repos/digital-blueprint/dispatch-app/contents/assets/dbp-dispatch.topic.metadata.json.ejs",
        ),
        (
            30,
            "https://api.github.com/repos/digital-blueprint/formalize-app/contents/assets/dbp-formalize.topic.metadata.json.ejs",
        ),
        (
            40,
            "https://api.github.com/repos/digital-blueprint/lunchlottery-app/contents/src/dbp-lunchlottery-app.topic.metadata.json",
        ),
    ];

    SOURCES
        .iter()
        .map(|&(rank, url)| SourceRef {
            url: url.to_string(),
            rank,
        })
        .collect()
}

/// Load the harvest configuration: the given JSON file, or the built-in
/// production defaults when no path is provided.
pub fn load(path: Option<&Path>) -> Result<HarvestConfig> {
    let Some(path) = path else {
        return Ok(HarvestConfig::with_sources(production_sources()));
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: HarvestConfig =
        serde_json::from_str(&raw).with_context(|| format!("Invalid {}", path.display()))?;
    Ok(config)
}
