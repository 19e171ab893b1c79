//! Error types shared across the relay pipeline.

/// Errors produced while turning a raw newswire document into a delivered
/// notification.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The document root is neither `NewsML` nor `newsMessage`. Fatal for the
    /// whole invocation; nothing is extracted.
    #[error("document root is not a recognized newswire dialect")]
    UnrecognizedDialect,

    /// One article is missing a required field (headline or body). The
    /// article is dropped; sibling articles are unaffected.
    #[error("malformed article: {0}")]
    MalformedArticle(String),

    /// The document is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The outward webhook call failed. Surfaced to the caller, not retried.
    #[error("webhook delivery failed: {0}")]
    Delivery(String),
}
