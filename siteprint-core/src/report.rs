// Report generation from scan results

use crate::cluster::{ClusterBucket, ClusterReport};
use serde::{Deserialize, Serialize};
use siteprint_crawler::CrawlOutcome;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Rows shown per grouping in text and markdown reports.
const GROUPING_DISPLAY_LIMIT: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

/// The complete scan artifact: traversal diagnostics plus the clustering
/// fingerprint. Constructed once from final results and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintReport {
    pub root_url: String,
    pub crawl: CrawlOutcome,
    pub clusters: ClusterReport,
    /// Actionable hints, populated only when traversal found zero URLs.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub suggestions: Vec<String>,
}

impl FingerprintReport {
    pub fn new(crawl: CrawlOutcome, clusters: ClusterReport) -> Self {
        let suggestions = if crawl.is_empty() {
            vec![
                "Check that the sitemap path is correct (common locations: /sitemap.xml, /sitemap_index.xml)".to_string(),
                "Verify the sitemap URL is publicly accessible and returns XML".to_string(),
                "Look for Sitemap: directives in the site's robots.txt".to_string(),
            ]
        } else {
            Vec::new()
        };

        Self {
            root_url: crawl.root_url.clone(),
            crawl,
            clusters,
            suggestions,
        }
    }

    pub fn no_urls_found(&self) -> bool {
        self.crawl.is_empty()
    }
}

pub fn generate_text_report(data: &FingerprintReport) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                      SITEPRINT URL-SPACE FINGERPRINT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("Root sitemap:     {}\n", data.root_url));
    report.push_str(&format!("URLs collected:   {}\n", data.crawl.urls.len()));
    report.push_str(&format!(
        "Sitemaps visited: {} ({} branches failed)\n",
        data.crawl.sitemaps_visited, data.crawl.branches_failed
    ));
    if data.crawl.urls_dropped > 0 {
        report.push_str(&format!("URLs dropped:     {} (invalid)\n", data.crawl.urls_dropped));
    }
    report.push_str(&format!(
        "Elapsed:          {:.1}s\n\n",
        data.crawl.elapsed.as_secs_f64()
    ));

    if data.no_urls_found() {
        report.push_str("No URLs found.\n\nSuggestions:\n");
        for suggestion in &data.suggestions {
            report.push_str(&format!("  - {}\n", suggestion));
        }
        report.push('\n');
        return report;
    }

    let summary = &data.clusters.summary;
    report.push_str("SUMMARY\n");
    report.push_str(&format!("  URLs analyzed:      {}\n", summary.total_urls));
    if summary.skipped_urls > 0 {
        report.push_str(&format!("  URLs skipped:       {}\n", summary.skipped_urls));
    }
    report.push_str(&format!("  Distinct categories: {}\n", summary.distinct_categories));
    report.push_str(&format!("  Distinct depths:     {}\n", summary.distinct_depths));
    report.push_str(&format!("  Distinct file types: {}\n", summary.distinct_file_types));
    report.push_str(&format!("  Distinct patterns:   {}\n", summary.distinct_patterns));
    report.push_str(&format!("  URLs with query:     {}\n\n", summary.urls_with_query));

    push_text_grouping(&mut report, "CATEGORIES", &data.clusters.categories);
    push_text_grouping(&mut report, "DEPTH DISTRIBUTION", &data.clusters.depths);
    push_text_grouping(&mut report, "FILE TYPES", &data.clusters.file_types);
    push_text_grouping(&mut report, "PATH PATTERNS", &data.clusters.path_patterns);
    push_text_grouping(&mut report, "QUERY PARAMETERS", &data.clusters.query_params);

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                              End of Report\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    report
}

fn push_text_grouping(report: &mut String, title: &str, buckets: &[ClusterBucket]) {
    report.push_str(&format!("{} ({} distinct)\n", title, buckets.len()));
    if buckets.is_empty() {
        report.push_str("  (none)\n\n");
        return;
    }
    for bucket in buckets.iter().take(GROUPING_DISPLAY_LIMIT) {
        report.push_str(&format!("  {:<50} {}\n", bucket.key, bucket.count));
    }
    if buckets.len() > GROUPING_DISPLAY_LIMIT {
        report.push_str(&format!(
            "  ... and {} more\n",
            buckets.len() - GROUPING_DISPLAY_LIMIT
        ));
    }
    report.push('\n');
}

pub fn generate_json_report(data: &FingerprintReport) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Siteprint",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "crawl": {
                "root_url": data.root_url,
                "urls_collected": data.crawl.urls.len(),
                "sitemaps_visited": data.crawl.sitemaps_visited,
                "branches_failed": data.crawl.branches_failed,
                "urls_dropped": data.crawl.urls_dropped,
                "elapsed_seconds": data.crawl.elapsed.as_secs_f64()
            },
            "clusters": data.clusters,
            "suggestions": data.suggestions
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(data: &FingerprintReport) -> String {
    let mut report = String::new();

    report.push_str("# Siteprint URL-Space Fingerprint\n\n");
    report.push_str(&format!("- **Root sitemap**: {}\n", data.root_url));
    report.push_str(&format!("- **URLs collected**: {}\n", data.crawl.urls.len()));
    report.push_str(&format!(
        "- **Sitemaps visited**: {} ({} branches failed)\n\n",
        data.crawl.sitemaps_visited, data.crawl.branches_failed
    ));

    if data.no_urls_found() {
        report.push_str("## No URLs found\n\n");
        for suggestion in &data.suggestions {
            report.push_str(&format!("- {}\n", suggestion));
        }
        return report;
    }

    let summary = &data.clusters.summary;
    report.push_str("## Summary\n\n");
    report.push_str("| Metric | Value |\n|---|---|\n");
    report.push_str(&format!("| URLs analyzed | {} |\n", summary.total_urls));
    report.push_str(&format!("| URLs skipped | {} |\n", summary.skipped_urls));
    report.push_str(&format!("| Distinct categories | {} |\n", summary.distinct_categories));
    report.push_str(&format!("| Distinct depths | {} |\n", summary.distinct_depths));
    report.push_str(&format!("| Distinct file types | {} |\n", summary.distinct_file_types));
    report.push_str(&format!("| Distinct patterns | {} |\n", summary.distinct_patterns));
    report.push_str(&format!("| URLs with query | {} |\n\n", summary.urls_with_query));

    push_markdown_grouping(&mut report, "Categories", &data.clusters.categories);
    push_markdown_grouping(&mut report, "Depth distribution", &data.clusters.depths);
    push_markdown_grouping(&mut report, "File types", &data.clusters.file_types);
    push_markdown_grouping(&mut report, "Path patterns", &data.clusters.path_patterns);
    push_markdown_grouping(&mut report, "Query parameters", &data.clusters.query_params);

    report
}

fn push_markdown_grouping(report: &mut String, title: &str, buckets: &[ClusterBucket]) {
    report.push_str(&format!("## {}\n\n", title));
    if buckets.is_empty() {
        report.push_str("_(none)_\n\n");
        return;
    }
    report.push_str("| Key | Count |\n|---|---|\n");
    for bucket in buckets.iter().take(GROUPING_DISPLAY_LIMIT) {
        report.push_str(&format!("| `{}` | {} |\n", bucket.key, bucket.count));
    }
    if buckets.len() > GROUPING_DISPLAY_LIMIT {
        report.push_str(&format!(
            "| _... {} more_ | |\n",
            buckets.len() - GROUPING_DISPLAY_LIMIT
        ));
    }
    report.push('\n');
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
