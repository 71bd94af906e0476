//! # Sigma Aggregator
//!
//! Offline aggregation of the per-record exploit archive.
//!
//! ## Pipeline
//!
//! ```text
//! Data directory (<id>.json per record)
//!     │
//!     ├──> File Scanner (top-level *.json, name order)
//!     │      └─> Record files
//!     │
//!     ├──> Normalizer (defaults, preview)
//!     │      └─> Records, sorted by id
//!     │
//!     ├──> Facet Collector
//!     │      └─> Archive stats
//!     │
//!     └──> Output writer
//!            └─> exploits.json + stats.json
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use sigma_aggregator::{Aggregator, AggregatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aggregator = Aggregator::new(AggregatorConfig::default())?;
//!     let report = aggregator.run().await?;
//!
//!     println!("Aggregated {} of {} files", report.processed, report.files_found);
//!     Ok(())
//! }
//! ```

mod aggregator;
mod config;
mod error;
mod facets;
mod normalize;
mod output;
mod report;
mod scanner;

pub use aggregator::{Aggregation, Aggregator};
pub use config::AggregatorConfig;
pub use error::{AggregatorError, Result};
pub use facets::{extract_year, FacetCollector};
pub use normalize::Normalizer;
pub use output::write_outputs;
pub use report::{AggregationReport, FileFailure};
pub use scanner::FileScanner;
