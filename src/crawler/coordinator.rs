//! Crawler coordinator - the page loop
//!
//! The coordinator requests pages 1, 2, 3, ... until a page comes back empty,
//! a fetch fails, or the page ceiling is reached. The gallery API reports no
//! total page count, so an empty page is the end-of-catalog marker.
//!
//! Nothing in the loop raises: a failed fetch ends the crawl early and a
//! failed snapshot write loses that page's file while the crawl moves on.

use crate::config::Config;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::snapshot::SnapshotWriter;
use crate::state::{CrawlState, TerminationReason};
use crate::HarvestError;
use chrono::{DateTime, Utc};

/// Outcome of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Extensions received across all non-empty pages
    pub total_extensions: usize,

    /// Pages whose snapshot was written
    pub pages_saved: u32,

    /// Pages that were fetched but whose snapshot could not be written
    pub failed_saves: Vec<u32>,

    /// Last page number requested
    pub last_page: u32,

    /// Why the loop stopped
    pub termination: TerminationReason,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Wall-clock duration of the crawl in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Main crawl coordinator
pub struct Coordinator {
    fetcher: PageFetcher,
    writer: SnapshotWriter,
    max_pages: u32,
}

impl Coordinator {
    /// Creates a coordinator from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = PageFetcher::new(&config.api)?;
        let writer = SnapshotWriter::new(&config.crawler.snapshot_dir);
        Ok(Self::from_parts(fetcher, writer, config.crawler.max_pages))
    }

    /// Assembles a coordinator from prepared components
    pub fn from_parts(fetcher: PageFetcher, writer: SnapshotWriter, max_pages: u32) -> Self {
        Self {
            fetcher,
            writer,
            max_pages,
        }
    }

    /// Runs the page loop to termination
    ///
    /// Pages are fetched strictly one after another.
    pub async fn run(&self) -> CrawlReport {
        let started_at = Utc::now();
        tracing::info!(
            "Starting crawl into {} (max {} pages)",
            self.writer.dir().display(),
            self.max_pages
        );

        if let Err(e) = self.writer.ensure_dir() {
            tracing::warn!("Snapshot directory unavailable: {}", e);
        }

        let mut state = CrawlState::start(self.max_pages);
        let mut total_extensions = 0;
        let mut pages_saved = 0;
        let mut failed_saves = Vec::new();
        let mut last_page = 0;

        while let Some(page) = state.current_page() {
            last_page = page;

            let extensions = match self.fetcher.fetch(page).await {
                Ok(extensions) => extensions,
                Err(e) => {
                    tracing::warn!("Stopping crawl: {}", e);
                    state = state.terminate(TerminationReason::FetchFailed(e.to_string()));
                    continue;
                }
            };

            if extensions.is_empty() {
                tracing::info!("No more extensions found after page {}", page - 1);
                state = state.terminate(TerminationReason::Exhausted);
                continue;
            }

            let count = extensions.len();
            total_extensions += count;
            tracing::info!(
                "Crawled page {}: Found {} extensions (Total: {})",
                page,
                count,
                total_extensions
            );

            match self.writer.save(extensions, page) {
                Ok(path) => {
                    pages_saved += 1;
                    tracing::debug!("Saved page {} to {}", page, path.display());
                }
                Err(e) => {
                    tracing::warn!("Error saving extensions for page {}: {}", page, e);
                    failed_saves.push(page);
                }
            }

            state = state.advance(self.max_pages);
        }

        let termination = match state {
            CrawlState::Terminated(reason) => reason,
            CrawlState::Running { .. } => TerminationReason::PageLimit,
        };

        let report = CrawlReport {
            total_extensions,
            pages_saved,
            failed_saves,
            last_page,
            termination,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl finished ({}): {} extensions in {} pages, {}s",
            report.termination,
            report.total_extensions,
            report.pages_saved,
            report.duration_seconds()
        );

        report
    }
}

/// Runs a complete crawl with the given configuration
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
