use serde::{Deserialize, Serialize};
use sigma_protocol::ArchiveStats;
use std::path::PathBuf;

/// A source file that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub file: String,
    pub error: String,
}

/// Statistics about an aggregation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationReport {
    /// Number of JSON files found in the data directory
    pub files_found: usize,

    /// Number of files turned into records
    pub processed: usize,

    /// Files skipped because they could not be read, parsed or normalized
    pub failures: Vec<FileFailure>,

    /// Time taken in milliseconds
    pub time_ms: u64,

    /// Distinct facet values in the written stats
    pub categories: usize,
    pub authors: usize,
    pub cves: usize,
    pub years: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats_path: Option<PathBuf>,
}

impl AggregationReport {
    pub fn new(files_found: usize) -> Self {
        Self {
            files_found,
            ..Default::default()
        }
    }

    pub fn add_record(&mut self) {
        self.processed += 1;
    }

    pub fn add_failure(&mut self, file: impl Into<String>, error: impl ToString) {
        self.failures.push(FileFailure {
            file: file.into(),
            error: error.to_string(),
        });
    }

    pub fn set_facets(&mut self, stats: &ArchiveStats) {
        self.categories = stats.categories.len();
        self.authors = stats.authors.len();
        self.cves = stats.cves.len();
        self.years = stats.years.len();
    }
}
