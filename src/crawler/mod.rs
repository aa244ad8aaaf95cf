//! Crawler module for the catalog crawl stage
//!
//! This module contains the crawl-side logic, including:
//! - Per-page query construction
//! - HTTP fetching and failure classification
//! - Snapshot persistence
//! - The page loop and its termination policy

mod coordinator;
mod fetcher;
mod query;
mod snapshot;

pub use coordinator::{run_crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, parse_query_response, FetchError, PageFetcher};
pub use query::{Criterion, ExtensionQuery, QueryFilter, QueryTemplate};
pub use snapshot::{
    list_snapshots, load_snapshots, read_snapshot, SnapshotError, SnapshotResult,
    SnapshotWriter, STRIPPED_FIELD,
};

pub use crate::state::TerminationReason;

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for the crawl stage. It will:
/// 1. Build the HTTP client
/// 2. Request pages until the catalog is exhausted, a fetch fails, or the
///    page ceiling is reached
/// 3. Write one snapshot per non-empty page
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl ran; the report says how far it got
/// * `Err(HarvestError)` - The crawl could not be set up
pub async fn crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    run_crawl(config).await
}
