//! Output module for terminal summaries
//!
//! - Crawl reports after the crawl stage
//! - Statistics read back from the exported SQLite table

mod report;
mod stats;

pub use report::format_crawl_report;
pub use stats::{format_statistics, load_statistics, print_statistics, TableStatistics};
