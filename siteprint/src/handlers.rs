use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use siteprint_core::cluster::analyze;
use siteprint_core::report::{
    FingerprintReport, ReportFormat, generate_json_report, generate_markdown_report,
    generate_text_report, save_report,
};
use siteprint_core::scan::{ScanOptions, execute_scan};
use siteprint_crawler::{CrawlOutcome, SitemapTraverser};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

// Helper functions for scan and analyze handlers

/// Load and parse URLs from a newline-delimited file
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read URL file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add https:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    // Try to parse as-is
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    // Try adding https://
    let with_scheme = format!("https://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("⚠️  Skipping invalid URL '{}'", line);
    None
}

/// Render a fingerprint report in the requested format
pub fn render_report(data: &FingerprintReport, format: &ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => generate_json_report(data)
            .map_err(|e| format!("Failed to serialize report: {}", e)),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

fn emit_report(content: &str, output: Option<&PathBuf>) {
    match output {
        Some(path) => match save_report(content, path) {
            Ok(()) => println!(
                "{} Report saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            ),
            Err(e) => {
                eprintln!("✗ Failed to save report to {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => print!("{}", content),
    }
}

fn report_format(sub_matches: &ArgMatches) -> ReportFormat {
    let name = sub_matches.get_one::<String>("format").unwrap();
    // The clap value_parser restricts values to the recognized set.
    ReportFormat::from_str(name).unwrap()
}

fn progress_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub async fn handle_scan(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = sub_matches.get_one::<Url>("url").unwrap();
    let max_depth = *sub_matches.get_one::<usize>("max-depth").unwrap();
    let max_urls = *sub_matches.get_one::<usize>("max-urls").unwrap();
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap();
    let wall_timeout = sub_matches.get_one::<u64>("wall-timeout").copied();
    let output = sub_matches.get_one::<PathBuf>("output");
    let format = report_format(sub_matches);

    println!("\n🕸️  Scanning {}", url.host_str().unwrap_or("unknown"));
    println!("Max depth: {}", max_depth);
    println!("URL budget: {}", max_urls);
    println!("Timeout: {}s\n", timeout_secs);

    let spinner = progress_spinner();
    spinner.set_message("Starting traversal...");

    let spinner_handle = spinner.clone();
    let progress_callback = Arc::new(move |msg: String| {
        spinner_handle.set_message(msg);
    });

    let options = ScanOptions {
        root_url: url.as_str().to_string(),
        max_depth,
        max_urls,
        timeout_secs,
        wall_clock_timeout: wall_timeout.map(Duration::from_secs),
    };

    let report = match execute_scan(options, Some(progress_callback)).await {
        Ok(report) => report,
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("✗ Scan failed: {}", e);
            std::process::exit(1);
        }
    };

    spinner.finish_and_clear();

    if report.no_urls_found() {
        println!("{} Scan finished with no URLs\n", "⚠".yellow().bold());
    } else {
        println!(
            "{} Scan complete: {} URLs in {:.1}s\n",
            "✓".green().bold(),
            report.crawl.urls.len().to_string().cyan(),
            report.crawl.elapsed.as_secs_f64()
        );
    }

    match render_report(&report, &format) {
        Ok(content) => emit_report(&content, output),
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

pub async fn handle_crawl(sub_matches: &ArgMatches) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let url = sub_matches.get_one::<Url>("url").unwrap();
    let max_depth = *sub_matches.get_one::<usize>("max-depth").unwrap();
    let max_urls = *sub_matches.get_one::<usize>("max-urls").unwrap();
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap();
    let output = sub_matches.get_one::<PathBuf>("output");
    let as_json = sub_matches.get_flag("json");

    println!("\n🕸️  Crawling {}", url.host_str().unwrap_or("unknown"));
    println!("Max depth: {}", max_depth);
    println!("URL budget: {}\n", max_urls);

    let spinner = progress_spinner();
    let spinner_handle = spinner.clone();

    let traverser = SitemapTraverser::with_timeout(timeout_secs)
        .with_max_depth(max_depth)
        .with_max_urls(max_urls)
        .with_progress_callback(Arc::new(move |collected, url| {
            spinner_handle.set_message(format!("{} URLs | fetching {}", collected, url));
        }));

    let outcome = match traverser.crawl(url.as_str()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            spinner.finish_and_clear();
            eprintln!("✗ Crawl failed: {}", e);
            std::process::exit(1);
        }
    };

    spinner.finish_and_clear();

    println!(
        "{} Crawl complete: {} URLs from {} sitemaps ({} branches failed)\n",
        "✓".green().bold(),
        outcome.urls.len().to_string().cyan(),
        outcome.sitemaps_visited,
        outcome.branches_failed
    );

    let content = if as_json {
        let mut json =
            serde_json::to_string_pretty(&outcome.urls).expect("Failed to serialize URL list");
        json.push('\n');
        json
    } else {
        let mut lines = outcome.urls.join("\n");
        if !lines.is_empty() {
            lines.push('\n');
        }
        lines
    };

    emit_report(&content, output);
}

pub fn handle_analyze(sub_matches: &ArgMatches) {
    let input = sub_matches.get_one::<PathBuf>("input").unwrap();
    let output = sub_matches.get_one::<PathBuf>("output");
    let format = report_format(sub_matches);

    let urls = match load_urls_from_file(input) {
        Ok(urls) => urls,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "\n🔍 Analyzing {} URLs from {}\n",
        urls.len().to_string().cyan(),
        input.display().to_string().bright_white()
    );

    let clusters = analyze(&urls);

    // Offline analysis reuses the report shape with a synthetic crawl record.
    let mut outcome = CrawlOutcome::new(input.display().to_string());
    outcome.urls = urls;
    let report = FingerprintReport::new(outcome, clusters);

    match render_report(&report, &format) {
        Ok(content) => emit_report(&content, output),
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}
