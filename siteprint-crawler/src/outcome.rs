use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Result of one top-level sitemap traversal.
///
/// `urls` preserves encounter order: sitemap-index order first, then
/// document order within each leaf set. Duplicates are permitted; the
/// traverser performs no de-duplication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOutcome {
    pub root_url: String,
    pub urls: Vec<String>,
    /// Sitemap documents fetched, including the root.
    pub sitemaps_visited: usize,
    /// Branches that contributed zero URLs due to fetch or decode failure.
    pub branches_failed: usize,
    /// Discovered entries dropped for failing absolute http/https parsing.
    pub urls_dropped: usize,
    pub elapsed: Duration,
}

impl CrawlOutcome {
    pub fn new(root_url: String) -> Self {
        Self {
            root_url,
            urls: Vec::new(),
            sitemaps_visited: 0,
            branches_failed: 0,
            urls_dropped: 0,
            elapsed: Duration::from_secs(0),
        }
    }

    /// Traversal produced zero page URLs. Non-fatal; callers surface this
    /// as a "no URLs found" result with suggestions rather than an error.
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
