use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {code} fetching {url}")]
    Status { code: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unrecognized sitemap document: {0}")]
    UnrecognizedDocument(String),

    #[error("XML decode error: {0}")]
    Xml(String),
}

pub type Result<T> = std::result::Result<T, CrawlError>;
