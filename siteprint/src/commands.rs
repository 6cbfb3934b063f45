use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("siteprint")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("siteprint")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("scan")
                .about(
                    "Crawl a sitemap tree and fingerprint the URL space: categories, depths, \
                file types, path patterns, query parameters.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The sitemap URL to scan (e.g. https://example.com/sitemap.xml)")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-d --"max-depth" <DEPTH>)
                        .required(false)
                        .help("Maximum sitemap-index nesting depth to follow")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("2"),
                )
                .arg(
                    arg!(-n --"max-urls" <COUNT>)
                        .required(false)
                        .help("Global budget of page URLs to collect")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("100"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("15"),
                )
                .arg(
                    arg!(--"wall-timeout" <SECONDS>)
                        .required(false)
                        .help("Wall-clock cap on the whole traversal; partial results on expiry")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown", "md"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a sitemap tree and list the page URLs it contains, without \
                clustering.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The sitemap URL to crawl")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-d --"max-depth" <DEPTH>)
                        .required(false)
                        .help("Maximum sitemap-index nesting depth to follow")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("2"),
                )
                .arg(
                    arg!(-n --"max-urls" <COUNT>)
                        .required(false)
                        .help("Global budget of page URLs to collect")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("100"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Per-request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("15"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the URL list to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(--"json")
                        .required(false)
                        .help("Emit the URL list as a JSON array instead of plain lines")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("analyze")
                .about(
                    "Cluster a newline-delimited file of URLs without crawling anything. \
                Useful for re-analyzing a saved crawl.",
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(true)
                        .help("Path to a newline-delimited file of URLs to analyze")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(["text", "json", "markdown", "md"])
                        .default_value("text"),
                ),
        )
}
