// src/feed/newsml_g2.rs
//! Extractor for IPTC NewsML-G2 (Reuters style, `<newsMessage>` root).
//!
//! G2 documents are namespaced; matching here is on local names. Feed
//! priority is the text of the first `priority` element. The wire document
//! carries no byline, so a fixed attribution stands in. The item id is
//! decoded from the `guid` attribute: final colon-delimited segment, with
//! the `newsml_` prefix stripped.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::RelayError;
use crate::feed::types::{FeedDialect, FeedMetadata, ParsedArticle, ParsedFeed};
use crate::feed::{append_text, attr_value, normalize_field, parse_priority, scan_methode_property};

/// Fixed attribution link for Reuters stories.
pub const SOURCE_LINK: &str = "http://about.reuters.com/";
/// Stand-in byline; the G2 wire document does not carry a reporter credit.
pub const PLACEHOLDER_BYLINE: &str = "Thomson Reuters";

#[derive(Default)]
struct Draft {
    guid: Option<String>,
    headline: String,
    slugline: String,
    paragraphs: Vec<String>,
}

enum Field {
    Headline,
    Slugline,
}

impl Draft {
    fn finish(self) -> Result<ParsedArticle, RelayError> {
        let headline = normalize_field(&self.headline);
        if headline.is_empty() {
            return Err(RelayError::MalformedArticle("missing headline".into()));
        }
        if self.paragraphs.is_empty() {
            return Err(RelayError::MalformedArticle(format!(
                "no body paragraphs for {headline:?}"
            )));
        }
        let slugline = normalize_field(&self.slugline);
        Ok(ParsedArticle {
            headline,
            body_paragraphs: self.paragraphs,
            byline: Some(PLACEHOLDER_BYLINE.to_string()),
            slugline: (!slugline.is_empty()).then_some(slugline),
            item_id: self.guid.as_deref().map(decode_item_id).unwrap_or_default(),
            source_link: SOURCE_LINK.to_string(),
        })
    }
}

/// `urn:newsml:example:newsml_ABCDEFGH` → `ABCDEFGH`, likewise for
/// `tag:reuters.com,2015:newsml_…` style guids.
fn decode_item_id(guid: &str) -> String {
    let seg = guid.rsplit(':').next().unwrap_or(guid);
    seg.strip_prefix("newsml_").unwrap_or(seg).to_string()
}

/// Walk the document once, collecting feed metadata and one draft per
/// `newsItem`. Paragraphs are the direct children of the `body` element;
/// nested inline markup flattens into its enclosing paragraph.
pub fn extract(xml: &str) -> Result<ParsedFeed, RelayError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut metadata = FeedMetadata::default();
    let mut priority_seen = false;
    let mut capturing_priority = false;
    let mut priority_buf = String::new();
    let mut articles = Vec::new();
    let mut dropped = 0usize;

    let mut draft: Option<Draft> = None;
    let mut field: Option<Field> = None;
    let mut in_body = false;
    let mut child_depth = 0u32;
    let mut para: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if in_body {
                    if child_depth == 0 {
                        para = Some(String::new());
                    }
                    child_depth += 1;
                    continue;
                }
                match e.local_name().as_ref() {
                    b"newsItem" => {
                        draft = Some(Draft {
                            guid: attr_value(&e, b"guid")?,
                            ..Draft::default()
                        });
                        field = None;
                    }
                    b"priority" if !priority_seen => capturing_priority = true,
                    b"Property" => scan_methode_property(&e, &mut metadata)?,
                    b"headline" if draft.is_some() => field = Some(Field::Headline),
                    b"slugline" if draft.is_some() => field = Some(Field::Slugline),
                    b"body" if draft.is_some() => {
                        in_body = true;
                        child_depth = 0;
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                // Childless elements directly under <body> (e.g. <br/>)
                // contribute no paragraph.
                if !in_body && e.local_name().as_ref() == b"Property" {
                    scan_methode_property(&e, &mut metadata)?;
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if capturing_priority {
                    append_text(&mut priority_buf, &text);
                } else if let Some(p) = para.as_mut() {
                    append_text(p, &text);
                } else if let (Some(d), Some(f)) = (draft.as_mut(), field.as_ref()) {
                    match f {
                        Field::Headline => append_text(&mut d.headline, &text),
                        Field::Slugline => append_text(&mut d.slugline, &text),
                    }
                }
            }
            Event::End(e) => {
                if in_body {
                    if child_depth > 0 {
                        child_depth -= 1;
                        if child_depth == 0 {
                            if let (Some(d), Some(p)) = (draft.as_mut(), para.take()) {
                                let p = normalize_field(&p);
                                if !p.is_empty() {
                                    d.paragraphs.push(p);
                                }
                            }
                        }
                    } else if e.local_name().as_ref() == b"body" {
                        in_body = false;
                    }
                    continue;
                }
                match e.local_name().as_ref() {
                    b"newsItem" => {
                        field = None;
                        para = None;
                        if let Some(d) = draft.take() {
                            match d.finish() {
                                Ok(article) => articles.push(article),
                                Err(err) => {
                                    tracing::warn!(error = %err, "dropping malformed article");
                                    dropped += 1;
                                }
                            }
                        }
                    }
                    b"priority" if capturing_priority => {
                        metadata.priority = parse_priority(&priority_buf);
                        priority_seen = true;
                        capturing_priority = false;
                    }
                    b"headline" | b"slugline" => field = None,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ParsedFeed {
        dialect: FeedDialect::NewsmlG2,
        metadata,
        articles,
        dropped,
    })
}
