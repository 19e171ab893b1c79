// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod debug;
pub mod error;
pub mod feed;
pub mod metrics;
pub mod notify;
pub mod payload;
pub mod priority;
pub mod relay;

// ---- Re-exports for stable public API ----
pub use crate::config::{Environment, RelayConfig};
pub use crate::error::RelayError;
pub use crate::feed::types::{FeedDialect, FeedMetadata, ParsedArticle, ParsedFeed};
pub use crate::notify::{DispatchMode, Notifier};
pub use crate::payload::{AssembleOptions, Attachment, NotificationPayload};
