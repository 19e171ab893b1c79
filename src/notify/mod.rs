// src/notify/mod.rs
//! Outward delivery: the [`Notifier`] capability and the per-invocation
//! dispatch decision.

pub mod slack;

use async_trait::async_trait;

use crate::error::RelayError;
use crate::payload::NotificationPayload;

/// How an invocation disposes of its assembled payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// POST the payload to the configured webhook.
    Deliver,
    /// Hand the payload back to the caller (non-production environments).
    Return,
}

/// Delivery channel abstraction. Injected into the pipeline so assembly and
/// extraction stay testable with no network dependency.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> Result<(), RelayError>;

    /// Human-readable channel name (e.g. "slack").
    fn name(&self) -> &'static str;
}
