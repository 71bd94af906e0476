use crate::browse::{browse, find_by_id};
use crate::{Result, SearchError};
use serde::de::DeserializeOwned;
use sigma_protocol::{
    ArchiveStats, BrowseQuery, Page, Record, RECORDS_FILE_NAME, STATS_FILE_NAME,
};
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;

/// Read-only view of an aggregated archive directory.
///
/// Each output file is loaded on first use and kept for the life of the store.
pub struct ArchiveStore {
    records_path: PathBuf,
    stats_path: PathBuf,
    records: OnceCell<Vec<Record>>,
    stats: OnceCell<ArchiveStats>,
}

impl ArchiveStore {
    /// Store over `<data_dir>/exploits.json` and `<data_dir>/stats.json`.
    pub fn open(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self::with_paths(dir.join(RECORDS_FILE_NAME), dir.join(STATS_FILE_NAME))
    }

    pub fn with_paths(records_path: impl Into<PathBuf>, stats_path: impl Into<PathBuf>) -> Self {
        Self {
            records_path: records_path.into(),
            stats_path: stats_path.into(),
            records: OnceCell::new(),
            stats: OnceCell::new(),
        }
    }

    /// Store over data already in memory; nothing is read from disk.
    pub fn from_parts(records: Vec<Record>, stats: ArchiveStats) -> Self {
        Self {
            records_path: PathBuf::new(),
            stats_path: PathBuf::new(),
            records: OnceCell::new_with(Some(records)),
            stats: OnceCell::new_with(Some(stats)),
        }
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }

    pub async fn records(&self) -> Result<&[Record]> {
        let records = self
            .records
            .get_or_try_init(|| load_json::<Vec<Record>>(&self.records_path))
            .await?;
        Ok(records.as_slice())
    }

    pub async fn stats(&self) -> Result<&ArchiveStats> {
        self.stats
            .get_or_try_init(|| load_json::<ArchiveStats>(&self.stats_path))
            .await
    }

    pub async fn browse(&self, query: &BrowseQuery) -> Result<Page<&Record>> {
        let records = self.records().await?;
        browse(records, query)
    }

    pub async fn get(&self, id: i64) -> Result<Option<&Record>> {
        let records = self.records().await?;
        Ok(find_by_id(records, id))
    }
}

async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SearchError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_slice(&bytes).map_err(|source| SearchError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(value)
}
