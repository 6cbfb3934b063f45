//! Decode sitemap XML into one of the two standard document shapes.

use crate::error::{CrawlError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A decoded sitemap document.
///
/// The sitemap protocol defines two top-level shapes: a `<sitemapindex>`
/// listing child sitemap URLs, and a `<urlset>` listing page URLs directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// A sitemap index; entries are URLs of further sitemap documents.
    Index(Vec<String>),
    /// A URL set; entries are page URLs and terminate traversal.
    UrlSet(Vec<String>),
}

/// Decode a sitemap XML document.
///
/// A malformed document that somehow carries both `<sitemap><loc>` and
/// `<url><loc>` entries decodes as an index. A document with neither
/// recognized shape is an `UnrecognizedDocument` error; callers recover
/// branch-locally.
pub fn parse_sitemap(xml: &str) -> Result<SitemapDocument> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut sitemap_locs: Vec<String> = Vec::new();
    let mut page_locs: Vec<String> = Vec::new();
    let mut saw_index_root = false;
    let mut saw_urlset_root = false;
    let mut in_sitemap = false;
    let mut in_url = false;
    let mut in_loc = false;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                // local_name strips namespace prefixes (<sm:loc> etc.)
                match e.local_name().as_ref() {
                    b"sitemapindex" => saw_index_root = true,
                    b"urlset" => saw_urlset_root = true,
                    b"sitemap" => in_sitemap = true,
                    b"url" => in_url = true,
                    b"loc" => in_loc = true,
                    _ => {}
                }
            }
            Ok(Event::Text(ref e)) if in_loc => {
                let text = e.unescape().unwrap_or_default().trim().to_string();
                if !text.is_empty() {
                    if in_sitemap {
                        sitemap_locs.push(text);
                    } else if in_url {
                        page_locs.push(text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"sitemap" => in_sitemap = false,
                b"url" => in_url = false,
                b"loc" => in_loc = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(CrawlError::Xml(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    // Index interpretation wins when a document carries both shapes.
    if !sitemap_locs.is_empty() || saw_index_root {
        Ok(SitemapDocument::Index(sitemap_locs))
    } else if !page_locs.is_empty() || saw_urlset_root {
        Ok(SitemapDocument::UrlSet(page_locs))
    } else {
        Err(CrawlError::UnrecognizedDocument(
            "matched neither <sitemapindex> nor <urlset>".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urlset() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <url><loc>https://example.com/page1</loc><lastmod>2024-01-01</lastmod></url>
  <url><loc>https://example.com/page2</loc></url>
</urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec![
                "https://example.com/page1".to_string(),
                "https://example.com/page2".to_string(),
            ])
        );
    }

    #[test]
    fn test_parse_sitemap_index() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://example.com/sitemap-a.xml</loc></sitemap>
  <sitemap><loc>https://example.com/sitemap-b.xml</loc></sitemap>
</sitemapindex>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::Index(vec![
                "https://example.com/sitemap-a.xml".to_string(),
                "https://example.com/sitemap-b.xml".to_string(),
            ])
        );
    }

    #[test]
    fn test_namespace_prefixed_tags() {
        let xml = r#"<?xml version="1.0"?>
<sm:urlset xmlns:sm="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sm:url><sm:loc>https://example.com/a</sm:loc></sm:url>
</sm:urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec!["https://example.com/a".to_string()])
        );
    }

    #[test]
    fn test_index_preferred_when_both_shapes_present() {
        let xml = r#"<mixed>
  <sitemap><loc>https://example.com/child.xml</loc></sitemap>
  <url><loc>https://example.com/page</loc></url>
</mixed>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::Index(vec!["https://example.com/child.xml".to_string()])
        );
    }

    #[test]
    fn test_empty_urlset_is_recognized() {
        let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#;
        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(doc, SitemapDocument::UrlSet(vec![]));
    }

    #[test]
    fn test_unrecognized_document() {
        let xml = "<html><body>not a sitemap</body></html>";
        let result = parse_sitemap(xml);
        assert!(matches!(result, Err(CrawlError::UnrecognizedDocument(_))));
    }

    #[test]
    fn test_escaped_entities_in_loc() {
        let xml = r#"<urlset>
  <url><loc>https://example.com/search?a=1&amp;b=2</loc></url>
</urlset>"#;

        let doc = parse_sitemap(xml).unwrap();
        assert_eq!(
            doc,
            SitemapDocument::UrlSet(vec!["https://example.com/search?a=1&b=2".to_string()])
        );
    }
}
