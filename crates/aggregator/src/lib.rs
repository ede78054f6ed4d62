//! # Nexus Aggregator
//!
//! Activity harvesting pipeline.
//!
//! ```text
//! Source URLs (ranked)
//!     │
//!     ├──> Fetch + decode + repair (per-URL failures become report values)
//!     │      └─> Tagged topic manifests
//!     │
//!     ├──> De-duplicate activity stubs (last write wins, first position kept)
//!     │      └─> Unique activity set
//!     │
//!     ├──> Two-phase locate (src/, then assets/)
//!     │      └─> Resolved activity metadata
//!     │
//!     └──> Emit artifacts
//!            ├─> dbp-nexus.topic.metadata.json.ejs
//!            └─> fetch-results-<timestamp>.json
//! ```

mod dedup;
mod emitter;
mod error;
mod locator;
mod pipeline;

pub use dedup::{merge_activities, StubSet};
pub use emitter::{
    render_topic_document, search_import_file_name, write_artifacts, write_search_import,
    write_topic_document, WrittenArtifacts,
};
pub use error::{AggregatorError, Result};
pub use locator::{locate_activity, LocateResult, LocatedActivity};
pub use pipeline::{run, HarvestConfig};
