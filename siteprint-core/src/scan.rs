//! Crawl-then-analyze orchestration: runs the sitemap traverser, feeds the
//! complete URL set to the cluster analyzer once, and assembles the report.

use crate::cluster;
use crate::report::FingerprintReport;
use siteprint_crawler::error::Result;
use siteprint_crawler::SitemapTraverser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Options for configuring a scan operation
pub struct ScanOptions {
    pub root_url: String,
    pub max_depth: usize,
    pub max_urls: usize,
    pub timeout_secs: u64,
    /// Wall-clock cap on the whole traversal; expiry yields a partial result.
    pub wall_clock_timeout: Option<Duration>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root_url: String::new(),
            max_depth: 2,
            max_urls: 100,
            timeout_secs: 15,
            wall_clock_timeout: None,
        }
    }
}

/// Callback for reporting scan progress
pub type ScanProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a scan with the given options.
///
/// The only fatal error is an invalid root URL; an unreachable or empty
/// sitemap tree produces a report flagged `no_urls_found` with suggestions.
pub async fn execute_scan(
    options: ScanOptions,
    progress_callback: Option<ScanProgressCallback>,
) -> Result<FingerprintReport> {
    let mut traverser = SitemapTraverser::with_timeout(options.timeout_secs)
        .with_max_depth(options.max_depth)
        .with_max_urls(options.max_urls);

    if let Some(timeout) = options.wall_clock_timeout {
        traverser = traverser.with_wall_clock_timeout(timeout);
    }

    if let Some(callback) = progress_callback {
        traverser = traverser.with_progress_callback(Arc::new(move |collected, url| {
            callback(format!("{} URLs | fetching {}", collected, url));
        }));
    }

    let outcome = traverser.crawl(&options.root_url).await?;
    info!(
        "Analyzing {} URLs from {}",
        outcome.urls.len(),
        options.root_url
    );

    let clusters = cluster::analyze(&outcome.urls);
    Ok(FingerprintReport::new(outcome, clusters))
}
