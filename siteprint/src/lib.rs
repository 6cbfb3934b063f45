// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    load_urls_from_file,
    parse_url_line,
    render_report,
};

// Re-export scan functionality from siteprint-core
pub use siteprint_core::report::{FingerprintReport, ReportFormat};
pub use siteprint_core::scan::{ScanOptions, ScanProgressCallback, execute_scan};
