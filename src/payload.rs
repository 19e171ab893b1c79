// src/payload.rs
//! Slack payload assembly: one [`Attachment`] per extracted article, feed
//! metadata folded into the fixed field list, minimum-priority filtering.
//!
//! Field order and titles are part of the output contract consumed by the
//! newsroom Slack channels; do not reorder them.

use metrics::counter;
use serde::{Deserialize, Serialize};

use crate::feed::types::{FeedDialect, FeedMetadata, ParsedArticle, ParsedFeed};
use crate::priority::{priority_color, priority_label};

/// One short field rendered in the attachment footer grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub short: bool,
}

impl AttachmentField {
    fn short(title: &str, value: Option<String>) -> Self {
        Self {
            title: title.to_string(),
            value,
            short: true,
        }
    }
}

/// One structured notification unit, derived 1:1 from a parsed article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Plain-text summary for clients that cannot render attachments.
    pub fallback: String,
    pub color: String,
    pub title: String,
    /// Call-to-attention marker; present only when the alert-priority policy
    /// is configured and met.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretext: Option<String>,
    /// Body paragraphs joined with newlines.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub author_link: String,
    pub fields: Vec<AttachmentField>,
}

/// The webhook payload: dialect tag plus attachments in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub text: String,
    #[serde(rename = "type")]
    pub dialect: FeedDialect,
    pub attachments: Vec<Attachment>,
}

/// Assembly policy, resolved from configuration before the invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    /// Articles with a feed priority numerically greater (less urgent) than
    /// this are excluded.
    pub min_priority: Option<i32>,
    /// Priorities `1..=N` add an `@channel` pretext. Unset: never alert.
    pub alert_priority: Option<i32>,
}

const PRETEXT_ALERT: &str = "@channel";

/// Build the notification payload for one parsed feed.
///
/// When every article is filtered out the payload has zero attachments;
/// callers decide whether that is worth delivering.
pub fn assemble(feed: &ParsedFeed, opts: &AssembleOptions) -> NotificationPayload {
    let mut attachments = Vec::with_capacity(feed.articles.len());
    let mut filtered = 0usize;

    for article in &feed.articles {
        if let Some(min) = opts.min_priority {
            if feed.metadata.priority > min {
                filtered += 1;
                continue;
            }
        }
        attachments.push(build_attachment(article, &feed.metadata, opts));
    }

    if filtered > 0 {
        counter!("relay_articles_filtered_total").increment(filtered as u64);
        tracing::debug!(
            filtered,
            min_priority = ?opts.min_priority,
            feed_priority = feed.metadata.priority,
            "articles below minimum priority"
        );
    }

    NotificationPayload {
        text: String::new(),
        dialect: feed.dialect,
        attachments,
    }
}

fn build_attachment(
    article: &ParsedArticle,
    metadata: &FeedMetadata,
    opts: &AssembleOptions,
) -> Attachment {
    let priority = metadata.priority;
    let excerpt = article
        .body_paragraphs
        .first()
        .map(String::as_str)
        .unwrap_or_default();

    let pretext = opts
        .alert_priority
        .filter(|alert| (1..=*alert).contains(&priority))
        .map(|_| PRETEXT_ALERT.to_string());

    Attachment {
        fallback: format!("{} [{}] -- {}", article.headline, priority, excerpt),
        color: priority_color(priority),
        title: article.headline.clone(),
        pretext,
        text: article.body_paragraphs.join("\n"),
        author_name: article.byline.clone(),
        author_link: article.source_link.clone(),
        fields: vec![
            AttachmentField::short("slugline", article.slugline.clone()),
            AttachmentField::short("Methode Name", metadata.source_system.clone()),
            AttachmentField::short(
                "News Item ID",
                (!article.item_id.is_empty()).then(|| article.item_id.clone()),
            ),
            AttachmentField::short("Priority", Some(priority_label(priority).to_string())),
        ],
    }
}
