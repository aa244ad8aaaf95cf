//! State module for tracking crawl progress
//!
//! - `CrawlState`: `Running { page }` until a terminal condition is recorded
//! - `TerminationReason`: empty page, failed fetch, or page ceiling

mod crawl_state;

pub use crawl_state::{CrawlState, TerminationReason};
