//! Bounded depth-first traversal of sitemap trees.

use crate::error::{CrawlError, Result};
use crate::outcome::CrawlOutcome;
use crate::sitemap::{self, SitemapDocument};
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

const DEFAULT_MAX_DEPTH: usize = 2;
const DEFAULT_MAX_URLS: usize = 100;
const DEFAULT_CHILD_CAP: usize = 20;
const DEFAULT_COURTESY_DELAY_MS: u64 = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Recursive sitemap traverser.
///
/// Walks a sitemap tree depth-first from a root URL, collecting page URLs
/// from leaf `<urlset>` documents and recursing through `<sitemapindex>`
/// documents. Traversal is bounded by `max_depth`, a global `max_urls`
/// budget, and a per-index fan-out cap. A failed or unrecognized branch
/// contributes zero URLs and never aborts its siblings.
///
/// Cyclic or duplicated sitemap references are not detected; the depth and
/// URL budgets are the only cycle-breaking mechanisms.
pub struct SitemapTraverser {
    client: Client,
    max_depth: usize,
    max_urls: usize,
    child_cap: usize,
    courtesy_delay: Duration,
    wall_clock_timeout: Option<Duration>,
    progress_callback: Option<ProgressCallback>,
}

struct TraversalState {
    outcome: CrawlOutcome,
    deadline: Option<Instant>,
    max_urls: usize,
}

impl TraversalState {
    fn remaining(&self) -> usize {
        self.max_urls.saturating_sub(self.outcome.urls.len())
    }

    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

impl SitemapTraverser {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Siteprint/0.2 (https://github.com/trapdoorsec/siteprint)")
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            max_depth: DEFAULT_MAX_DEPTH,
            max_urls: DEFAULT_MAX_URLS,
            child_cap: DEFAULT_CHILD_CAP,
            courtesy_delay: Duration::from_millis(DEFAULT_COURTESY_DELAY_MS),
            wall_clock_timeout: None,
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_max_urls(mut self, max_urls: usize) -> Self {
        self.max_urls = max_urls;
        self
    }

    pub fn with_child_cap(mut self, cap: usize) -> Self {
        self.child_cap = cap;
        self
    }

    pub fn with_courtesy_delay(mut self, delay: Duration) -> Self {
        self.courtesy_delay = delay;
        self
    }

    /// Wall-clock cap on the whole traversal. On expiry the traverser stops
    /// recursing and returns the partial URL set gathered so far.
    pub fn with_wall_clock_timeout(mut self, timeout: Duration) -> Self {
        self.wall_clock_timeout = Some(timeout);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Traverse the sitemap tree rooted at `root_url`.
    ///
    /// The only fatal error is a root URL that is not an absolute http/https
    /// URL. Every per-branch failure (network error, non-2xx status,
    /// unrecognized XML) is recovered locally and reflected in the outcome
    /// counters.
    pub async fn crawl(&self, root_url: &str) -> Result<CrawlOutcome> {
        let parsed = Url::parse(root_url)
            .map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", root_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CrawlError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                root_url,
                parsed.scheme()
            )));
        }

        info!(
            "Starting sitemap traversal of {} (max_depth={}, max_urls={})",
            root_url, self.max_depth, self.max_urls
        );

        let start = Instant::now();
        let mut state = TraversalState {
            outcome: CrawlOutcome::new(root_url.to_string()),
            deadline: self.wall_clock_timeout.map(|t| start + t),
            max_urls: self.max_urls,
        };

        self.visit(root_url.to_string(), 0, &mut state).await;

        state.outcome.elapsed = start.elapsed();
        info!(
            "Traversal complete: {} URLs from {} sitemaps ({} branches failed)",
            state.outcome.urls.len(),
            state.outcome.sitemaps_visited,
            state.outcome.branches_failed
        );
        Ok(state.outcome)
    }

    /// Visit one sitemap node. Boxed because the future recurses.
    fn visit<'a>(
        &'a self,
        url: String,
        depth: usize,
        state: &'a mut TraversalState,
    ) -> BoxFuture<'a, ()> {
        async move {
            // Depth exhaustion is a terminal condition, not an error.
            if depth >= self.max_depth {
                debug!("Depth limit reached at {} (depth {})", url, depth);
                return;
            }
            if state.remaining() == 0 || state.deadline_passed() {
                return;
            }

            if let Some(ref callback) = self.progress_callback {
                callback(state.outcome.urls.len(), url.clone());
            }

            state.outcome.sitemaps_visited += 1;
            let body = match self.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Fetch failed for {}: {}", url, e);
                    state.outcome.branches_failed += 1;
                    return;
                }
            };

            match sitemap::parse_sitemap(&body) {
                Ok(SitemapDocument::Index(children)) => {
                    if children.len() > self.child_cap {
                        debug!(
                            "Capping index fan-out at {} of {} children ({})",
                            self.child_cap,
                            children.len(),
                            url
                        );
                    }
                    for (i, child) in children.into_iter().take(self.child_cap).enumerate() {
                        if state.remaining() == 0 {
                            debug!("URL budget exhausted, skipping remaining children of {}", url);
                            break;
                        }
                        if state.deadline_passed() {
                            warn!("Deadline reached, returning partial result from {}", url);
                            break;
                        }
                        if i > 0 {
                            // Courtesy throttle between sibling fetches.
                            tokio::time::sleep(self.courtesy_delay).await;
                        }
                        self.visit(child, depth + 1, state).await;
                    }
                }
                Ok(SitemapDocument::UrlSet(locs)) => {
                    // Leaf set: never recurses regardless of remaining depth.
                    let remaining = state.remaining();
                    for loc in locs.into_iter().take(remaining) {
                        match Url::parse(&loc) {
                            Ok(u) if matches!(u.scheme(), "http" | "https") => {
                                state.outcome.urls.push(loc);
                            }
                            _ => {
                                debug!("Dropping invalid page URL: {}", loc);
                                state.outcome.urls_dropped += 1;
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!("Skipping branch {}: {}", url, e);
                    state.outcome.branches_failed += 1;
                }
            }
        }
        .boxed()
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

impl Default for SitemapTraverser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn urlset(urls: &[&str]) -> String {
        let entries: String = urls
            .iter()
            .map(|u| format!("<url><loc>{}</loc></url>", u))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
            entries
        )
    }

    fn sitemap_index(sitemaps: &[&str]) -> String {
        let entries: String = sitemaps
            .iter()
            .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
            entries
        )
    }

    async fn mount_xml(server: &MockServer, at: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/xml")
                    .set_body_string(body),
            )
            .mount(server)
            .await;
    }

    /// Index of 3 children, each a leaf set of 2 URLs: all 6 returned in
    /// encounter order.
    #[tokio::test]
    async fn test_index_traversal_preserves_order() {
        let server = MockServer::start().await;
        let base = server.uri();

        let children: Vec<String> = (1..=3)
            .map(|i| format!("{}/sitemap-{}.xml", base, i))
            .collect();
        let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
        mount_xml(&server, "/sitemap.xml", sitemap_index(&child_refs)).await;

        for i in 1..=3 {
            mount_xml(
                &server,
                &format!("/sitemap-{}.xml", i),
                urlset(&[
                    &format!("https://example.com/section{}/a", i),
                    &format!("https://example.com/section{}/b", i),
                ]),
            )
            .await;
        }

        let traverser = SitemapTraverser::new()
            .with_max_depth(2)
            .with_max_urls(100)
            .with_courtesy_delay(Duration::from_millis(1));

        let outcome = traverser
            .crawl(&format!("{}/sitemap.xml", base))
            .await
            .unwrap();

        assert_eq!(
            outcome.urls,
            vec![
                "https://example.com/section1/a",
                "https://example.com/section1/b",
                "https://example.com/section2/a",
                "https://example.com/section2/b",
                "https://example.com/section3/a",
                "https://example.com/section3/b",
            ]
        );
        assert_eq!(outcome.sitemaps_visited, 4);
        assert_eq!(outcome.branches_failed, 0);
        assert_eq!(outcome.urls_dropped, 0);
    }

    /// One of three children is unreachable: the other two still contribute,
    /// and no error propagates to the caller.
    #[tokio::test]
    async fn test_failed_branch_is_isolated() {
        let server = MockServer::start().await;
        let base = server.uri();

        let children: Vec<String> = (1..=3)
            .map(|i| format!("{}/sitemap-{}.xml", base, i))
            .collect();
        let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
        mount_xml(&server, "/sitemap.xml", sitemap_index(&child_refs)).await;

        mount_xml(&server, "/sitemap-1.xml", urlset(&["https://example.com/a"])).await;
        Mock::given(method("GET"))
            .and(path("/sitemap-2.xml"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        mount_xml(&server, "/sitemap-3.xml", urlset(&["https://example.com/c"])).await;

        let traverser = SitemapTraverser::new()
            .with_max_depth(2)
            .with_courtesy_delay(Duration::from_millis(1));

        let outcome = traverser
            .crawl(&format!("{}/sitemap.xml", base))
            .await
            .unwrap();

        assert_eq!(
            outcome.urls,
            vec!["https://example.com/a", "https://example.com/c"]
        );
        assert_eq!(outcome.branches_failed, 1);
    }

    /// A timed-out child never blocks or aborts its siblings.
    #[tokio::test]
    async fn test_timed_out_branch_is_isolated() {
        let server = MockServer::start().await;
        let base = server.uri();

        let children: Vec<String> = (1..=2)
            .map(|i| format!("{}/sitemap-{}.xml", base, i))
            .collect();
        let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
        mount_xml(&server, "/sitemap.xml", sitemap_index(&child_refs)).await;

        Mock::given(method("GET"))
            .and(path("/sitemap-1.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(urlset(&["https://example.com/slow"]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        mount_xml(&server, "/sitemap-2.xml", urlset(&["https://example.com/fast"])).await;

        let traverser = SitemapTraverser::with_timeout(1)
            .with_max_depth(2)
            .with_courtesy_delay(Duration::from_millis(1));

        let outcome = traverser
            .crawl(&format!("{}/sitemap.xml", base))
            .await
            .unwrap();

        assert_eq!(outcome.urls, vec!["https://example.com/fast"]);
        assert_eq!(outcome.branches_failed, 1);
    }

    /// Total URLs returned never exceed the budget, across leaf sets.
    #[tokio::test]
    async fn test_url_budget_is_global() {
        let server = MockServer::start().await;
        let base = server.uri();

        let children: Vec<String> = (1..=2)
            .map(|i| format!("{}/sitemap-{}.xml", base, i))
            .collect();
        let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
        mount_xml(&server, "/sitemap.xml", sitemap_index(&child_refs)).await;

        let many: Vec<String> = (0..10)
            .map(|i| format!("https://example.com/one/{}", i))
            .collect();
        let many_refs: Vec<&str> = many.iter().map(String::as_str).collect();
        mount_xml(&server, "/sitemap-1.xml", urlset(&many_refs)).await;
        mount_xml(&server, "/sitemap-2.xml", urlset(&["https://example.com/two/0"])).await;

        let traverser = SitemapTraverser::new()
            .with_max_depth(2)
            .with_max_urls(7)
            .with_courtesy_delay(Duration::from_millis(1));

        let outcome = traverser
            .crawl(&format!("{}/sitemap.xml", base))
            .await
            .unwrap();

        assert_eq!(outcome.urls.len(), 7);
        // First leaf fills most of the budget; no URL from the second leaf
        // beyond the remainder.
        assert!(outcome.urls.iter().all(|u| u.contains("/one/")));
    }

    /// No fetch ever happens at depth >= max_depth.
    #[tokio::test]
    async fn test_depth_limit_stops_recursion() {
        let server = MockServer::start().await;
        let base = server.uri();

        let child = format!("{}/sitemap-child.xml", base);
        mount_xml(&server, "/sitemap.xml", sitemap_index(&[&child])).await;

        Mock::given(method("GET"))
            .and(path("/sitemap-child.xml"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(urlset(&["https://example.com/a"])),
            )
            .expect(0)
            .mount(&server)
            .await;

        let traverser = SitemapTraverser::new()
            .with_max_depth(1)
            .with_courtesy_delay(Duration::from_millis(1));

        let outcome = traverser
            .crawl(&format!("{}/sitemap.xml", base))
            .await
            .unwrap();

        assert!(outcome.is_empty());
    }

    /// Discovered entries that are not absolute http/https URLs are dropped,
    /// not fatal.
    #[tokio::test]
    async fn test_invalid_page_urls_dropped() {
        let server = MockServer::start().await;
        let base = server.uri();

        mount_xml(
            &server,
            "/sitemap.xml",
            urlset(&[
                "https://example.com/valid",
                "ftp://example.com/nope",
                "/relative/path",
                "http://example.com/also-valid",
            ]),
        )
        .await;

        let traverser = SitemapTraverser::new();
        let outcome = traverser
            .crawl(&format!("{}/sitemap.xml", base))
            .await
            .unwrap();

        assert_eq!(
            outcome.urls,
            vec![
                "https://example.com/valid",
                "http://example.com/also-valid"
            ]
        );
        assert_eq!(outcome.urls_dropped, 2);
    }

    /// A root document that is not a sitemap yields an empty, non-fatal
    /// outcome.
    #[tokio::test]
    async fn test_unrecognized_root_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string("<html><body>404 page</body></html>"),
            )
            .mount(&server)
            .await;

        let traverser = SitemapTraverser::new();
        let outcome = traverser
            .crawl(&format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap();

        assert!(outcome.is_empty());
        assert_eq!(outcome.branches_failed, 1);
    }

    /// An expired wall-clock deadline returns the partial result instead of
    /// an error.
    #[tokio::test]
    async fn test_expired_deadline_returns_partial() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&["https://example.com/a"])))
            .expect(0)
            .mount(&server)
            .await;

        let traverser =
            SitemapTraverser::new().with_wall_clock_timeout(Duration::from_secs(0));

        let outcome = traverser
            .crawl(&format!("{}/sitemap.xml", server.uri()))
            .await
            .unwrap();

        assert!(outcome.is_empty());
        assert_eq!(outcome.sitemaps_visited, 0);
    }

    #[tokio::test]
    async fn test_invalid_root_url_is_fatal() {
        let traverser = SitemapTraverser::new();
        let result = traverser.crawl("not a url").await;
        assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));

        let result = traverser.crawl("ftp://example.com/sitemap.xml").await;
        assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));
    }
}
