use crate::{AggregatorConfig, Result};
use serde::Serialize;
use sigma_protocol::{ArchiveStats, Record};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Write the record list and the stats summary as pretty-printed JSON,
/// creating the output directory when needed. Returns the two paths written.
pub async fn write_outputs(
    config: &AggregatorConfig,
    records: &[Record],
    stats: &ArchiveStats,
) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(&config.output_dir).await?;

    let records_path = config.records_path();
    write_json(&records_path, records).await?;

    let stats_path = config.stats_path();
    write_json(&stats_path, stats).await?;

    Ok((records_path, stats_path))
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    fs::write(path, data).await?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}
