// src/feed/legacy_newsml.rs
//! Extractor for the older NewsML 1.x dialect (Press Association style,
//! `<NewsML>` root).
//!
//! Feed priority comes from the `Priority` element's `FormalName` attribute;
//! per-article fields come from the `NewsLines` children, and body paragraphs
//! are the `<p>` elements under `body.content`.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::RelayError;
use crate::feed::types::{FeedDialect, FeedMetadata, ParsedArticle, ParsedFeed};
use crate::feed::{
    append_text, attr_value, normalize_field, parse_priority, scan_methode_property,
    strip_byline_prefix,
};

/// Fixed attribution link for PA stories.
pub const SOURCE_LINK: &str = "https://www.pressassociation.com/";

#[derive(Default)]
struct Draft {
    headline: String,
    byline: String,
    slugline: String,
    item_id: String,
    paragraphs: Vec<String>,
}

enum Field {
    Headline,
    Byline,
    Slugline,
    ItemId,
}

impl Draft {
    fn finish(self) -> Result<ParsedArticle, RelayError> {
        let headline = normalize_field(&self.headline);
        if headline.is_empty() {
            return Err(RelayError::MalformedArticle("missing HeadLine".into()));
        }
        if self.paragraphs.is_empty() {
            return Err(RelayError::MalformedArticle(format!(
                "no body paragraphs for {headline:?}"
            )));
        }
        let byline = strip_byline_prefix(&normalize_field(&self.byline));
        let slugline = normalize_field(&self.slugline);
        Ok(ParsedArticle {
            headline,
            body_paragraphs: self.paragraphs,
            byline: (!byline.is_empty()).then_some(byline),
            slugline: (!slugline.is_empty()).then_some(slugline),
            item_id: normalize_field(&self.item_id),
            source_link: SOURCE_LINK.to_string(),
        })
    }
}

/// Walk the document once, collecting feed metadata and one draft per
/// `NewsItem`. A draft missing a required field is dropped with a warning;
/// its siblings are unaffected.
pub fn extract(xml: &str) -> Result<ParsedFeed, RelayError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut metadata = FeedMetadata::default();
    let mut priority_seen = false;
    let mut articles = Vec::new();
    let mut dropped = 0usize;

    let mut draft: Option<Draft> = None;
    let mut field: Option<Field> = None;
    let mut body_scope = 0u32;
    let mut para: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"NewsItem" => {
                    draft = Some(Draft::default());
                    field = None;
                    body_scope = 0;
                    para = None;
                }
                b"Priority" if !priority_seen => {
                    if let Some(v) = attr_value(&e, b"FormalName")? {
                        metadata.priority = parse_priority(&v);
                        priority_seen = true;
                    }
                }
                b"Property" => scan_methode_property(&e, &mut metadata)?,
                b"HeadLine" if draft.is_some() => field = Some(Field::Headline),
                b"ByLine" if draft.is_some() => field = Some(Field::Byline),
                b"SlugLine" if draft.is_some() => field = Some(Field::Slugline),
                b"NewsItemId" if draft.is_some() => field = Some(Field::ItemId),
                b"body" | b"body.content" if draft.is_some() => body_scope += 1,
                b"p" if body_scope > 0 => para = Some(String::new()),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"Priority" if !priority_seen => {
                    if let Some(v) = attr_value(&e, b"FormalName")? {
                        metadata.priority = parse_priority(&v);
                        priority_seen = true;
                    }
                }
                b"Property" => scan_methode_property(&e, &mut metadata)?,
                _ => {}
            },
            Event::Text(t) => {
                let text = t.unescape()?;
                if let Some(p) = para.as_mut() {
                    append_text(p, &text);
                } else if let (Some(d), Some(f)) = (draft.as_mut(), field.as_ref()) {
                    let buf = match f {
                        Field::Headline => &mut d.headline,
                        Field::Byline => &mut d.byline,
                        Field::Slugline => &mut d.slugline,
                        Field::ItemId => &mut d.item_id,
                    };
                    append_text(buf, &text);
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"NewsItem" => {
                    field = None;
                    body_scope = 0;
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
                b"p" => {
                    if let (Some(d), Some(p)) = (draft.as_mut(), para.take()) {
                        let p = normalize_field(&p);
                        if !p.is_empty() {
                            d.paragraphs.push(p);
                        }
                    }
                }
                b"body" | b"body.content" => body_scope = body_scope.saturating_sub(1),
                b"HeadLine" | b"ByLine" | b"SlugLine" | b"NewsItemId" => field = None,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(ParsedFeed {
        dialect: FeedDialect::LegacyNewsml,
        metadata,
        articles,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(headline: &str, body: &str) -> String {
        format!(
            "<NewsItem>\
               <Identification><NewsIdentifier><NewsItemId>PA1</NewsItemId></NewsIdentifier></Identification>\
               <NewsComponent>\
                 <NewsLines><HeadLine>{headline}</HeadLine><ByLine>By Jane Doe</ByLine><SlugLine>UK-TEST</SlugLine></NewsLines>\
                 <ContentItem><DataContent><body><body.content>{body}</body.content></body></DataContent></ContentItem>\
               </NewsComponent>\
             </NewsItem>"
        )
    }

    fn doc(items: &str) -> String {
        format!(
            "<NewsML>\
               <NewsEnvelope><Priority FormalName=\"4\"/>\
                 <Property FormalName=\"NIMethodeName\" Value=\"PA Newsdesk\"/>\
               </NewsEnvelope>{items}\
             </NewsML>"
        )
    }

    #[test]
    fn extracts_fields_and_feed_metadata() {
        let xml = doc(&item("HEADLINE", "<p>BODY ONE</p><p>BODY TWO</p>"));
        let feed = extract(&xml).unwrap();

        assert_eq!(feed.dialect, FeedDialect::LegacyNewsml);
        assert_eq!(feed.metadata.priority, 4);
        assert_eq!(feed.metadata.source_system.as_deref(), Some("PA Newsdesk"));
        assert_eq!(feed.articles.len(), 1);

        let a = &feed.articles[0];
        assert_eq!(a.headline, "HEADLINE");
        assert_eq!(a.body_paragraphs, vec!["BODY ONE", "BODY TWO"]);
        assert_eq!(a.byline.as_deref(), Some("Jane Doe"));
        assert_eq!(a.slugline.as_deref(), Some("UK-TEST"));
        assert_eq!(a.item_id, "PA1");
        assert_eq!(a.source_link, SOURCE_LINK);
    }

    #[test]
    fn inline_markup_inside_paragraph_is_flattened() {
        let xml = doc(&item("HEADLINE", "<p>Shares <em>fell</em> sharply</p>"));
        let feed = extract(&xml).unwrap();
        assert_eq!(feed.articles[0].body_paragraphs, vec!["Shares fell sharply"]);
    }

    #[test]
    fn missing_headline_drops_only_that_article() {
        let good = item("GOOD", "<p>Body</p>");
        let bad = item("", "<p>Body</p>");
        let xml = doc(&format!("{bad}{good}"));
        let feed = extract(&xml).unwrap();

        assert_eq!(feed.articles.len(), 1);
        assert_eq!(feed.dropped, 1);
        assert_eq!(feed.articles[0].headline, "GOOD");
    }

    #[test]
    fn empty_body_is_malformed() {
        let xml = doc(&item("HEADLINE", "<p>  </p>"));
        let feed = extract(&xml).unwrap();
        assert!(feed.articles.is_empty());
        assert_eq!(feed.dropped, 1);
    }

    #[test]
    fn missing_optional_fields_become_none() {
        let xml = doc(
            "<NewsItem><NewsComponent>\
               <NewsLines><HeadLine>HEADLINE</HeadLine></NewsLines>\
               <ContentItem><DataContent><body><body.content><p>Body</p></body.content></body></DataContent></ContentItem>\
             </NewsComponent></NewsItem>",
        );
        let feed = extract(&xml).unwrap();
        let a = &feed.articles[0];
        assert_eq!(a.byline, None);
        assert_eq!(a.slugline, None);
        assert_eq!(a.item_id, "");
    }

    #[test]
    fn unparsable_priority_maps_to_zero() {
        let xml = "<NewsML><NewsEnvelope><Priority FormalName=\"flash\"/></NewsEnvelope></NewsML>";
        let feed = extract(xml).unwrap();
        assert_eq!(feed.metadata.priority, 0);
    }
}
