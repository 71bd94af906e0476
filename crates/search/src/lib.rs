//! In-memory browsing over an aggregated archive: filter, sort, paginate.

mod browse;
mod error;
mod filter;
mod paginate;
mod sort;
mod store;

pub use browse::{browse, find_by_id};
pub use error::{Result, SearchError};
pub use filter::{matches, search_records, RecordFilter};
pub use paginate::paginate;
pub use sort::sort_records;
pub use store::ArchiveStore;
