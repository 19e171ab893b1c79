// src/feed/types.rs
use serde::{Deserialize, Serialize};

/// The two newswire XML schemas we accept, keyed off the document root.
///
/// Serialized with the wire-service labels the downstream Slack consumers
/// already know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedDialect {
    /// Older NewsML 1.x as sent by the Press Association (`<NewsML>` root).
    #[serde(rename = "PA")]
    LegacyNewsml,
    /// IPTC NewsML-G2 as sent by Reuters (`<newsMessage>` root).
    #[serde(rename = "Reuters")]
    NewsmlG2,
}

impl FeedDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedDialect::LegacyNewsml => "PA",
            FeedDialect::NewsmlG2 => "Reuters",
        }
    }
}

/// Feed-level attributes shared by every article in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedMetadata {
    /// Wire priority, 1 (flash) .. 8 (lowest). `0` when the document carried
    /// none or an unparsable value.
    pub priority: i32,
    /// Upstream authoring-system identifier (the "Methode name" property).
    pub source_system: Option<String>,
}

/// One news item, extracted into the dialect-independent shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArticle {
    pub headline: String,
    /// Paragraphs in document order. Never empty for a parsed article.
    pub body_paragraphs: Vec<String>,
    /// Reporter credit with any leading "By " stripped. `None` when the
    /// document carries no byline at all.
    pub byline: Option<String>,
    pub slugline: Option<String>,
    /// Wire item id; empty when the document carried none.
    pub item_id: String,
    /// Fixed attribution URL for the originating wire service.
    pub source_link: String,
}

/// Result of one full document parse.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    pub dialect: FeedDialect,
    pub metadata: FeedMetadata,
    /// Articles in document order; malformed siblings have been dropped.
    pub articles: Vec<ParsedArticle>,
    /// How many articles were dropped as malformed.
    pub dropped: usize,
}
