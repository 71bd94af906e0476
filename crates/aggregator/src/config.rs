use crate::{AggregatorError, Result};
use serde::{Deserialize, Serialize};
use sigma_protocol::{RECORDS_FILE_NAME, STATS_FILE_NAME};
use std::path::PathBuf;

/// Configuration for one aggregation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregatorConfig {
    /// Directory holding one `<id>.json` file per record
    pub data_dir: PathBuf,

    /// Directory receiving the record list and the stats summary
    pub output_dir: PathBuf,

    /// File name of the aggregated record list
    pub records_file: String,

    /// File name of the stats summary
    pub stats_file: String,

    /// Files read per batch
    pub batch_size: usize,

    /// Characters of content kept in `content_preview`
    pub preview_chars: usize,

    /// Authors kept in `author_counts`
    pub top_authors: usize,

    /// Source label for records that do not name one
    pub default_source: String,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("public/data"),
            records_file: RECORDS_FILE_NAME.to_string(),
            stats_file: STATS_FILE_NAME.to_string(),
            batch_size: 1000,
            preview_chars: 200,
            top_authors: 50,
            default_source: "0day.today".to_string(),
        }
    }
}

impl AggregatorConfig {
    pub fn records_path(&self) -> PathBuf {
        self.output_dir.join(&self.records_file)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.output_dir.join(&self.stats_file)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(AggregatorError::InvalidConfig(
                "batch_size must be > 0".to_string(),
            ));
        }

        for (name, value) in [
            ("records_file", &self.records_file),
            ("stats_file", &self.stats_file),
        ] {
            if value.trim().is_empty() {
                return Err(AggregatorError::InvalidConfig(format!(
                    "{name} must not be empty"
                )));
            }
        }

        if self.records_file == self.stats_file {
            return Err(AggregatorError::InvalidConfig(format!(
                "records_file and stats_file both point at `{}`",
                self.records_file
            )));
        }

        Ok(())
    }
}
