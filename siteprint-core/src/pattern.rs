//! Path-pattern normalization: collapse numeric and Hebrew-script segments
//! into generic markers so structurally similar paths group together.

use once_cell::sync::Lazy;
use regex::Regex;

pub const YEAR_MARKER: &str = "{year}";
pub const NUM_MARKER: &str = "{num}";
pub const ID_MARKER: &str = "{id}";
pub const HEBREW_MARKER: &str = "{hebrew}";

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("static regex"));
static HEBREW_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{Hebrew}+").expect("static regex"));

/// True if any character falls in the Hebrew Unicode block.
pub fn contains_hebrew(s: &str) -> bool {
    s.chars().any(|c| ('\u{0590}'..='\u{05FF}').contains(&c))
}

/// True if the segment carries percent-encoded bytes in the Hebrew UTF-8
/// range (the `%D7`/`%D6` lead-byte family). Hex case is not significant.
pub fn looks_hebrew_encoded(segment: &str) -> bool {
    let upper = segment.to_ascii_uppercase();
    upper.contains("%D7") || upper.contains("%D6")
}

/// Percent-decode a segment, accepting the result only when it contains at
/// least one Hebrew character.
pub fn decode_hebrew_segment(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment).ok()?;
    contains_hebrew(&decoded).then(|| decoded.into_owned())
}

/// Normalize a decoded path into its structural pattern.
///
/// Applied in fixed order:
/// 1. Hebrew-encoded segments are percent-decoded where possible.
/// 2. Runs of Hebrew characters become `{hebrew}`.
/// 3. Each maximal digit run is replaced by a marker chosen by run length:
///    exactly 4 digits => `{year}`, exactly 2 => `{num}`, anything else =>
///    `{id}`. A single pass over maximal runs means the generic `{id}` rule
///    cannot shadow the more specific year/two-digit rules.
pub fn normalize_path(segments: &[String]) -> String {
    let decoded: Vec<String> = segments
        .iter()
        .map(|seg| {
            if looks_hebrew_encoded(seg) {
                decode_hebrew_segment(seg).unwrap_or_else(|| seg.clone())
            } else {
                seg.clone()
            }
        })
        .collect();

    let joined = format!("/{}", decoded.join("/"));
    let hebrew_collapsed = HEBREW_RUN.replace_all(&joined, HEBREW_MARKER);
    DIGIT_RUN
        .replace_all(&hebrew_collapsed, |caps: &regex::Captures| {
            match caps[0].len() {
                4 => YEAR_MARKER,
                2 => NUM_MARKER,
                _ => ID_MARKER,
            }
        })
        .into_owned()
}
