//! Multi-dimensional URL clustering.
//!
//! `analyze` is a pure function of its input: no I/O, total (URLs that fail
//! to parse are counted as skipped and excluded from every grouping), and
//! deterministic for a fixed input order.

use crate::pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// One key in a grouping with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterBucket {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// URLs that parsed and were classified.
    pub total_urls: usize,
    /// URLs dropped for failing to parse.
    pub skipped_urls: usize,
    pub distinct_categories: usize,
    pub distinct_depths: usize,
    pub distinct_file_types: usize,
    pub distinct_patterns: usize,
    /// URLs carrying at least one query parameter.
    pub urls_with_query: usize,
}

/// Structural fingerprint of a URL set: five independent groupings plus a
/// summary. Each grouping is sorted by descending count, ties broken by
/// first encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub categories: Vec<ClusterBucket>,
    pub depths: Vec<ClusterBucket>,
    pub file_types: Vec<ClusterBucket>,
    pub path_patterns: Vec<ClusterBucket>,
    pub query_params: Vec<ClusterBucket>,
    pub summary: ClusterSummary,
}

/// Counter preserving first-encounter order for deterministic tie-breaks.
#[derive(Default)]
struct Counter {
    counts: HashMap<String, usize>,
    order: Vec<String>,
}

impl Counter {
    fn bump(&mut self, key: String) {
        match self.counts.get_mut(&key) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(key.clone(), 1);
                self.order.push(key);
            }
        }
    }

    fn into_sorted(self) -> Vec<ClusterBucket> {
        let counts = self.counts;
        let mut buckets: Vec<ClusterBucket> = self
            .order
            .into_iter()
            .map(|key| {
                let count = counts[&key];
                ClusterBucket { key, count }
            })
            .collect();
        // Stable sort keeps insertion order among equal counts.
        buckets.sort_by(|a, b| b.count.cmp(&a.count));
        buckets
    }
}

/// Cluster a URL set along five independent dimensions.
pub fn analyze(urls: &[String]) -> ClusterReport {
    let mut categories = Counter::default();
    let mut depths = Counter::default();
    let mut file_types = Counter::default();
    let mut path_patterns = Counter::default();
    let mut query_params = Counter::default();
    let mut total_urls = 0;
    let mut skipped_urls = 0;
    let mut urls_with_query = 0;

    for raw in urls {
        let Ok(parsed) = Url::parse(raw) else {
            skipped_urls += 1;
            continue;
        };
        total_urls += 1;

        let segments: Vec<String> = parsed
            .path()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        categories.bump(categorize(&segments));
        depths.bump(format!("depth_{}", segments.len()));
        file_types.bump(file_type(&segments));
        path_patterns.bump(pattern::normalize_path(&segments));

        let mut saw_query = false;
        for (name, _value) in parsed.query_pairs() {
            saw_query = true;
            query_params.bump(name.into_owned());
        }
        if saw_query {
            urls_with_query += 1;
        }
    }

    let categories = categories.into_sorted();
    let depths = depths.into_sorted();
    let file_types = file_types.into_sorted();
    let path_patterns = path_patterns.into_sorted();
    let query_params = query_params.into_sorted();

    let summary = ClusterSummary {
        total_urls,
        skipped_urls,
        distinct_categories: categories.len(),
        distinct_depths: depths.len(),
        distinct_file_types: file_types.len(),
        distinct_patterns: path_patterns.len(),
        urls_with_query,
    };

    ClusterReport {
        categories,
        depths,
        file_types,
        path_patterns,
        query_params,
        summary,
    }
}

/// Pick the category segment for a URL path.
///
/// The first path segment, with two refinements: a two-lowercase-letter
/// first segment is treated as a locale prefix and the second segment is
/// promoted; a Hebrew-encoded candidate is percent-decoded when the result
/// contains Hebrew text, falling back on decode failure to the next
/// unencoded segment, else the raw segment.
fn categorize(segments: &[String]) -> String {
    let Some(first) = segments.first() else {
        return "root".to_string();
    };

    let (idx, candidate) = if is_locale_prefix(first) {
        match segments.get(1) {
            Some(second) => (1, second),
            None => (0, first),
        }
    } else {
        (0, first)
    };

    if pattern::looks_hebrew_encoded(candidate) {
        if let Some(decoded) = pattern::decode_hebrew_segment(candidate) {
            return decoded;
        }
        if let Some(next) = segments.get(idx + 1)
            && !next.contains('%')
        {
            return next.clone();
        }
    }

    candidate.clone()
}

fn is_locale_prefix(segment: &str) -> bool {
    segment.len() == 2 && segment.chars().all(|c| c.is_ascii_lowercase())
}

/// Lowercased extension of the final path segment, or `no_extension`.
fn file_type(segments: &[String]) -> String {
    match segments.last().and_then(|s| s.rsplit_once('.')) {
        Some((_, ext)) if !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => "no_extension".to_string(),
    }
}
