pub mod error;
pub mod outcome;
pub mod sitemap;
pub mod traverser;

pub use error::CrawlError;
pub use outcome::CrawlOutcome;
pub use sitemap::SitemapDocument;
pub use traverser::SitemapTraverser;
