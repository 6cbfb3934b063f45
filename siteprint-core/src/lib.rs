pub mod cluster;
pub mod pattern;
pub mod report;
pub mod scan;

pub use cluster::{ClusterBucket, ClusterReport, ClusterSummary, analyze};
pub use report::{FingerprintReport, ReportFormat};
pub use scan::{ScanOptions, execute_scan};

pub fn print_banner() {
    println!(
        r#"
   _____ _ __                  _      __
  / ___/(_) /____  ____  _____(_)___ / /_
  \__ \/ / __/ _ \/ __ \/ ___/ / __ \ __/
 ___/ / / /_/  __/ /_/ / /  / / / / / /_
/____/_/\__/\___/ .___/_/  /_/_/ /_/\__/
               /_/
"#
    );
    println!(
        "siteprint v{} - sitemap crawler and URL-space fingerprinting\n",
        env!("CARGO_PKG_VERSION")
    );
}
