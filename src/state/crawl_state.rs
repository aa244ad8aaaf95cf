/// Crawl loop state definitions
///
/// The crawl advances through increasing page numbers until one terminal
/// condition is met.
use std::fmt;

/// Why a crawl stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// A page came back successfully but empty: the end of the catalog
    Exhausted,

    /// A page fetch failed (transport, status, or response shape)
    FetchFailed(String),

    /// The configured page ceiling was reached
    PageLimit,
}

impl TerminationReason {
    /// Returns true if the catalog was read to its end
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    /// Returns true if the crawl was cut short by a failed fetch
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed(_))
    }

    /// Short label used in logs and reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exhausted => "exhausted",
            Self::FetchFailed(_) => "fetch_failed",
            Self::PageLimit => "page_limit",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed(reason) => write!(f, "fetch_failed ({})", reason),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Current state of the crawl loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    /// The given page is the next one to request
    Running { page: u32 },

    /// No further pages will be requested
    Terminated(TerminationReason),
}

impl CrawlState {
    /// Initial state: page 1 is next, unless the ceiling allows no pages at all
    pub fn start(max_pages: u32) -> Self {
        if max_pages == 0 {
            Self::Terminated(TerminationReason::PageLimit)
        } else {
            Self::Running { page: 1 }
        }
    }

    /// Returns the page to fetch next, if still running
    pub fn current_page(&self) -> Option<u32> {
        match self {
            Self::Running { page } => Some(*page),
            Self::Terminated(_) => None,
        }
    }

    /// Returns true once the crawl has stopped
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated(_))
    }

    /// Moves past a successfully saved page
    ///
    /// Reaching `max_pages` terminates with [`TerminationReason::PageLimit`].
    /// A terminated crawl stays terminated.
    pub fn advance(self, max_pages: u32) -> Self {
        match self {
            Self::Running { page } if page >= max_pages => {
                Self::Terminated(TerminationReason::PageLimit)
            }
            Self::Running { page } => Self::Running { page: page + 1 },
            terminated => terminated,
        }
    }

    /// Stops the crawl; the first recorded reason wins
    pub fn terminate(self, reason: TerminationReason) -> Self {
        match self {
            Self::Running { .. } => Self::Terminated(reason),
            terminated => terminated,
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running { page } => write!(f, "running (page {})", page),
            Self::Terminated(reason) => write!(f, "terminated: {}", reason),
        }
    }
}
