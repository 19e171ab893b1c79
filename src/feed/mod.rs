// src/feed/mod.rs
//! Newswire document parsing: dialect detection plus the two extraction
//! strategies that share the [`types::ParsedArticle`] contract.

pub mod legacy_newsml;
pub mod newsml_g2;
pub mod types;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::RelayError;
use crate::feed::types::{FeedDialect, FeedMetadata, ParsedFeed};

/// Formal name of the feed-level property that carries the authoring-system
/// identifier in both dialects.
pub(crate) const METHODE_PROPERTY: &str = "NIMethodeName";

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("relay_documents_total", "Documents parsed, by dialect.");
        describe_counter!(
            "relay_articles_total",
            "Articles successfully extracted from documents."
        );
        describe_counter!(
            "relay_articles_dropped_total",
            "Articles dropped as malformed (missing headline/body)."
        );
        describe_counter!(
            "relay_articles_filtered_total",
            "Articles excluded by the minimum-priority filter."
        );
        describe_counter!(
            "relay_delivery_failures_total",
            "Failed webhook deliveries."
        );
        describe_histogram!("relay_parse_ms", "Document parse time in milliseconds.");
    });
}

/// Parse one raw newswire document into the dialect-independent feed shape.
///
/// Detects the dialect from the root element, then hands the document to the
/// matching extractor. Malformed articles are dropped inside the extractor;
/// an unrecognized root or ill-formed XML fails the whole invocation.
pub fn parse_feed(raw: &str) -> Result<ParsedFeed, RelayError> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();

    let xml = scrub_html_entities_for_xml(raw);
    let dialect = detect_dialect(&xml)?;
    let feed = match dialect {
        FeedDialect::LegacyNewsml => legacy_newsml::extract(&xml)?,
        FeedDialect::NewsmlG2 => newsml_g2::extract(&xml)?,
    };

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("relay_parse_ms").record(ms);
    counter!("relay_documents_total", "dialect" => dialect.as_str()).increment(1);
    counter!("relay_articles_total").increment(feed.articles.len() as u64);
    counter!("relay_articles_dropped_total").increment(feed.dropped as u64);

    tracing::debug!(
        dialect = dialect.as_str(),
        articles = feed.articles.len(),
        dropped = feed.dropped,
        "parsed newswire document"
    );
    Ok(feed)
}

/// Select the dialect from the document's root element tag.
pub fn detect_dialect(xml: &str) -> Result<FeedDialect, RelayError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return match e.local_name().as_ref() {
                    b"NewsML" => Ok(FeedDialect::LegacyNewsml),
                    b"newsMessage" => Ok(FeedDialect::NewsmlG2),
                    _ => Err(RelayError::UnrecognizedDialect),
                };
            }
            Event::Eof => return Err(RelayError::UnrecognizedDialect),
            _ => {}
        }
    }
}

/// Wire feeds embed HTML entities that are not valid XML entities; replace
/// the usual suspects before handing the document to the XML parser.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

/// Normalize an extracted text field: decode entities, collapse whitespace,
/// trim.
pub(crate) fn normalize_field(s: &str) -> String {
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    let decoded = html_escape::decode_html_entities(s);
    re_ws.replace_all(decoded.as_ref(), " ").trim().to_string()
}

/// Strip a leading "By " credit prefix from a byline.
pub(crate) fn strip_byline_prefix(s: &str) -> String {
    s.strip_prefix("By ").unwrap_or(s).to_string()
}

/// Wire priorities arrive as attribute or element text; anything unparsable
/// maps to 0, which downstream mappers treat as "not set".
pub(crate) fn parse_priority(s: &str) -> i32 {
    s.trim().parse().unwrap_or(0)
}

/// First attribute on `e` with the given local name, unescaped.
pub(crate) fn attr_value(
    e: &BytesStart,
    name: &[u8],
) -> Result<Option<String>, quick_xml::Error> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Record the authoring-system name from a
/// `<Property FormalName="NIMethodeName" Value="..."/>` element. First match
/// wins; both dialects carry the property in the same shape.
pub(crate) fn scan_methode_property(
    e: &BytesStart,
    metadata: &mut FeedMetadata,
) -> Result<(), quick_xml::Error> {
    if metadata.source_system.is_none()
        && attr_value(e, b"FormalName")?.as_deref() == Some(METHODE_PROPERTY)
    {
        metadata.source_system = attr_value(e, b"Value")?
            .map(|v| normalize_field(&v))
            .filter(|v| !v.is_empty());
    }
    Ok(())
}

/// Append a text chunk to a buffer, separating chunks with a single space.
/// Text arrives in pieces around nested inline markup and CDATA boundaries.
pub(crate) fn append_text(buf: &mut String, chunk: &str) {
    if chunk.is_empty() {
        return;
    }
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(chunk);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_legacy_root() {
        let xml = "<NewsML><NewsEnvelope/></NewsML>";
        assert_eq!(detect_dialect(xml).unwrap(), FeedDialect::LegacyNewsml);
    }

    #[test]
    fn detects_g2_root_with_namespace() {
        let xml = r#"<n:newsMessage xmlns:n="http://iptc.org/std/nar/2006-10-01/"></n:newsMessage>"#;
        assert_eq!(detect_dialect(xml).unwrap(), FeedDialect::NewsmlG2);
    }

    #[test]
    fn unknown_root_is_fatal() {
        let err = detect_dialect("<rss version=\"2.0\"></rss>").unwrap_err();
        assert!(matches!(err, RelayError::UnrecognizedDialect));
    }

    #[test]
    fn empty_document_is_unrecognized() {
        let err = detect_dialect("   ").unwrap_err();
        assert!(matches!(err, RelayError::UnrecognizedDialect));
    }

    #[test]
    fn normalize_collapses_whitespace_and_entities() {
        assert_eq!(normalize_field("  MARKETS \n\t update&amp;more  "), "MARKETS update&more");
    }

    #[test]
    fn byline_prefix_is_stripped_once_and_only_leading() {
        assert_eq!(strip_byline_prefix("By Jane Doe"), "Jane Doe");
        assert_eq!(strip_byline_prefix("Jane Doe"), "Jane Doe");
        assert_eq!(strip_byline_prefix("Story By Jane"), "Story By Jane");
    }

    #[test]
    fn priority_parse_falls_back_to_zero() {
        assert_eq!(parse_priority(" 4 "), 4);
        assert_eq!(parse_priority("flash"), 0);
        assert_eq!(parse_priority(""), 0);
    }

    #[test]
    fn scrub_replaces_html_entities() {
        let out = scrub_html_entities_for_xml("a&nbsp;b &ndash; c&rsquo;s");
        assert_eq!(out, "a b - c's");
    }
}
