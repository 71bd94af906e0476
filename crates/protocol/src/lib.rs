use anyhow::Result;
use serde::Serialize;

mod query;
mod record;
mod stats;

pub use query::{BrowseQuery, Page, SearchFilters, SortKey, SortOrder, DEFAULT_PAGE_SIZE};
pub use record::Record;
pub use stats::{ArchiveStats, RankedCounts};

/// File name of the aggregated record list inside an archive data directory.
pub const RECORDS_FILE_NAME: &str = "exploits.json";

/// File name of the precomputed statistics inside an archive data directory.
pub const STATS_FILE_NAME: &str = "stats.json";

/// Category assigned to records that do not carry one.
pub const DEFAULT_CATEGORY: &str = "other";

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// JSON Schema documents for the two aggregated output files.
pub fn output_schemas() -> serde_json::Value {
    serde_json::json!({
        "record": schemars::schema_for!(Record),
        "stats": schemars::schema_for!(ArchiveStats),
    })
}
