//! Crawl report formatting

use crate::crawler::CrawlReport;

/// Formats a crawl report for the terminal
pub fn format_crawl_report(report: &CrawlReport) -> String {
    let mut out = String::new();
    out.push_str("=== Crawl Report ===\n\n");
    out.push_str(&format!("Started: {}\n", report.started_at.to_rfc3339()));
    out.push_str(&format!("Finished: {}\n", report.finished_at.to_rfc3339()));
    out.push_str(&format!("Duration: {}s\n", report.duration_seconds()));
    out.push_str(&format!("Stopped: {}\n", report.termination));
    out.push_str(&format!("Last page requested: {}\n", report.last_page));
    out.push_str(&format!("Pages saved: {}\n", report.pages_saved));
    if !report.failed_saves.is_empty() {
        let pages: Vec<String> = report.failed_saves.iter().map(u32::to_string).collect();
        out.push_str(&format!("Pages not saved: {}\n", pages.join(", ")));
    }
    out.push_str(&format!("Total extensions: {}\n", report.total_extensions));
    out
}
