use crate::facets::FacetCollector;
use crate::normalize::Normalizer;
use crate::output::write_outputs;
use crate::scanner::FileScanner;
use crate::{AggregationReport, AggregatorConfig, Result};
use sigma_protocol::{ArchiveStats, Record};
use std::path::Path;
use std::time::Instant;

const PROGRESS_EVERY: usize = 1000;

/// Records and statistics produced by one pass over the data directory
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Sorted by id ascending
    pub records: Vec<Record>,
    pub stats: ArchiveStats,
    pub report: AggregationReport,
}

/// Batch driver: scan → normalize → sort → derive stats → write
pub struct Aggregator {
    config: AggregatorConfig,
    normalizer: Normalizer,
}

impl Aggregator {
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::from_config(&config);
        Ok(Self { config, normalizer })
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Aggregate the data directory and write both output files.
    pub async fn run(&self) -> Result<AggregationReport> {
        let Aggregation {
            records,
            stats,
            mut report,
        } = self.aggregate().await?;

        let (records_path, stats_path) = write_outputs(&self.config, &records, &stats).await?;
        report.records_path = Some(records_path);
        report.stats_path = Some(stats_path);

        log::info!(
            "Aggregation complete: {} records, {} categories, {} authors, {} CVEs, {} years",
            stats.total_exploits,
            report.categories,
            report.authors,
            report.cves,
            report.years
        );
        Ok(report)
    }

    /// Aggregate the data directory without writing anything.
    ///
    /// Files that cannot be read, parsed or normalized are logged, recorded
    /// in the report and skipped.
    pub async fn aggregate(&self) -> Result<Aggregation> {
        let started = Instant::now();
        let files = FileScanner::new(&self.config.data_dir).scan()?;
        let mut report = AggregationReport::new(files.len());
        let mut records = Vec::with_capacity(files.len());

        for (batch_idx, batch) in files.chunks(self.config.batch_size).enumerate() {
            log::debug!("Batch {} ({} files)", batch_idx + 1, batch.len());

            for path in batch {
                let file_name = display_name(path);
                match self.load_record(path, &file_name).await {
                    Ok(record) => {
                        records.push(record);
                        report.add_record();
                        if report.processed % PROGRESS_EVERY == 0 {
                            log::info!("Processed {}/{} files...", report.processed, files.len());
                        }
                    }
                    Err(err) => {
                        log::error!("Error processing file {file_name}: {err}");
                        report.add_failure(file_name, err);
                    }
                }
            }
        }

        records.sort_by_key(|record| record.id);
        log::info!("Successfully processed {} records", records.len());

        let mut facets = FacetCollector::new();
        facets.observe_all(&records);
        let stats = facets.finish(self.config.top_authors);
        report.set_facets(&stats);
        report.time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        Ok(Aggregation {
            records,
            stats,
            report,
        })
    }

    async fn load_record(&self, path: &Path, file_name: &str) -> Result<Record> {
        let raw = tokio::fs::read_to_string(path).await?;
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        self.normalizer.normalize(&value, file_name)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
