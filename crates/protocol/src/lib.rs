use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Localized display strings keyed by language code (`"de"`, `"en"`, ...).
///
/// A `BTreeMap` keeps iteration order deterministic, which makes the
/// projection fallback in [`localized_text`] stable across runs.
pub type LocalizedText = BTreeMap<String, String>;

/// One configured topic-manifest URL.
///
/// Sources are processed in ascending `rank`, ties broken by configuration
/// order. Later sources win de-duplication collisions, so ranks encode the
/// merge-order constraints between applications that used to live in
/// comments next to the URL list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRef {
    pub url: String,
    #[serde(default)]
    pub rank: u32,
}

/// Wire shape of a GitHub contents-API response for a single file.
///
/// `content` is the base64 text of the target file; `encoding` is expected
/// to be the literal `"base64"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentsEnvelope {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

/// What went wrong for one URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    Http { status: u16 },
    Transport,
    Decode,
    Parse,
    UnsupportedEncoding { encoding: String },
}

/// A recoverable per-URL failure.
///
/// These are values, not errors: one bad source must never abort the batch,
/// so every fetch/decode/parse problem is converted into a `FetchFailure`
/// and collected in the [`HarvestReport`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FetchFailure {
    pub url: String,
    #[serde(flatten)]
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn new(url: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            message: message.into(),
        }
    }
}

/// A reference to one activity's metadata file inside a topic manifest.
///
/// `path` is the de-duplication key. The owning-application fields are not
/// part of the wire format; they are attached while merging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityStub {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(
        default,
        rename = "appName",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_name: Option<String>,
    #[serde(
        default,
        rename = "appGitUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_git_url: Option<String>,
}

impl ActivityStub {
    /// Activities are visible unless the manifest says otherwise.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

/// A parsed per-application topic manifest.
///
/// `routing_name` is unique per application but not across the aggregated
/// result; only activity stubs are de-duplicated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicManifest {
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub short_name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub routing_name: String,
    #[serde(default)]
    pub activities: Vec<ActivityStub>,
    #[serde(default)]
    pub attributes: Vec<serde_json::Value>,
}

/// A topic manifest together with the application identity derived from the
/// contents-API file descriptor it was fetched from.
#[derive(Debug, Clone)]
pub struct TaggedManifest {
    pub manifest: TopicManifest,
    pub app_name: String,
    pub app_git_url: String,
}

/// The fully resolved descriptor for one activity, fetched from its own
/// metadata file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityMetadata {
    /// Custom element tag name. A metadata file without it cannot be
    /// rendered and is treated as a miss by the locator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    /// Module source path, resolved against the metadata file's own URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_src: Option<String>,
    #[serde(default)]
    pub routing_name: String,
    #[serde(default)]
    pub name: LocalizedText,
    #[serde(default)]
    pub short_name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    /// Comma-separated provider attribute names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscribe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub required_roles: Vec<String>,
    #[serde(
        default,
        rename = "appName",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_name: Option<String>,
    #[serde(
        default,
        rename = "appGitUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub app_git_url: Option<String>,
    /// Inherited from the activity stub, defaulting to visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

/// Flattened projection of one resolved activity for the search-index
/// import file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchImportRecord {
    pub activity_name: String,
    pub activity_path: String,
    pub activity_description: String,
    pub activity_routing_name: String,
    pub activity_module_src: String,
    pub activity_tag: String,
    pub activity_icon: String,
}

impl SearchImportRecord {
    pub fn project(path: &str, metadata: &ActivityMetadata) -> Self {
        Self {
            activity_name: localized_text(&metadata.name).to_string(),
            activity_path: path.to_string(),
            activity_description: localized_text(&metadata.description).to_string(),
            activity_routing_name: metadata.routing_name.clone(),
            activity_module_src: metadata.module_src.clone().unwrap_or_default(),
            activity_tag: metadata.element.clone().unwrap_or_default(),
            activity_icon: metadata.icon.clone().unwrap_or_default(),
        }
    }
}

/// Pick the display text for a localized mapping: English, else German,
/// else the entry with the smallest language code.
pub fn localized_text(text: &LocalizedText) -> &str {
    text.get("en")
        .or_else(|| text.get("de"))
        .or_else(|| text.values().next())
        .map(String::as_str)
        .unwrap_or("")
}

/// Emitted when both candidate locations for an activity's metadata file
/// fail and the activity is dropped from the output artifacts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocateWarning {
    pub path: String,
    /// The candidate URLs, in the order they were attempted.
    pub attempted: Vec<String>,
}

/// Summary of one harvest run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarvestReport {
    pub timestamp: String,
    pub sources_total: usize,
    pub sources_fetched: usize,
    pub failures: Vec<FetchFailure>,
    pub activities_discovered: usize,
    pub activities_resolved: usize,
    pub locate_warnings: Vec<LocateWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_artifact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_artifact: Option<String>,
}
