// src/relay.rs
//! # Relay pipeline
//! One invocation: raw XML → parsed feed → payload → dispatch. Pure apart
//! from the injected [`Notifier`], so the whole pipeline is unit-testable
//! without a network.

use crate::error::RelayError;
use crate::feed;
use crate::notify::{DispatchMode, Notifier};
use crate::payload::{self, AssembleOptions, NotificationPayload};

/// What one invocation produced.
#[derive(Debug, Clone)]
pub struct RelayOutcome {
    pub payload: NotificationPayload,
    /// Articles dropped as malformed during extraction.
    pub dropped: usize,
    /// Whether the payload went out over the wire (vs. returned locally).
    pub delivered: bool,
}

/// Process one newswire document.
///
/// Dialect detection failure or ill-formed XML aborts the invocation; a
/// failed delivery surfaces as [`RelayError::Delivery`]. In `Return` mode
/// the payload is handed back without touching the network.
pub async fn process(
    raw_xml: &str,
    opts: &AssembleOptions,
    mode: DispatchMode,
    notifier: &dyn Notifier,
    debug_payload: bool,
) -> Result<RelayOutcome, RelayError> {
    let feed = feed::parse_feed(raw_xml)?;
    let payload = payload::assemble(&feed, opts);

    if debug_payload {
        if let Ok(js) = serde_json::to_string_pretty(&payload) {
            tracing::debug!(payload = %js, "assembled payload");
        }
    }

    let delivered = match mode {
        DispatchMode::Deliver => {
            notifier.send(&payload).await?;
            true
        }
        DispatchMode::Return => false,
    };

    Ok(RelayOutcome {
        payload,
        dropped: feed.dropped,
        delivered,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingNotifier {
        sent: AtomicUsize,
    }

    impl CountingNotifier {
        fn new() -> Self {
            Self {
                sent: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Notifier for CountingNotifier {
        async fn send(&self, _payload: &NotificationPayload) -> Result<(), RelayError> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    struct FailingNotifier;

    #[async_trait::async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _payload: &NotificationPayload) -> Result<(), RelayError> {
            Err(RelayError::Delivery("boom".into()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    const DOC: &str = "<NewsML><NewsEnvelope><Priority FormalName=\"4\"/></NewsEnvelope>\
         <NewsItem><NewsComponent>\
           <NewsLines><HeadLine>HEADLINE</HeadLine></NewsLines>\
           <ContentItem><DataContent><body><body.content><p>BODY</p></body.content></body></DataContent></ContentItem>\
         </NewsComponent></NewsItem></NewsML>";

    #[tokio::test]
    async fn return_mode_never_touches_the_notifier() {
        let n = CountingNotifier::new();
        let out = process(DOC, &AssembleOptions::default(), DispatchMode::Return, &n, false)
            .await
            .unwrap();
        assert!(!out.delivered);
        assert_eq!(out.payload.attachments.len(), 1);
        assert_eq!(n.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn deliver_mode_sends_exactly_once() {
        let n = CountingNotifier::new();
        let out = process(DOC, &AssembleOptions::default(), DispatchMode::Deliver, &n, false)
            .await
            .unwrap();
        assert!(out.delivered);
        assert_eq!(n.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn delivery_failure_is_fatal_for_the_invocation() {
        let err = process(
            DOC,
            &AssembleOptions::default(),
            DispatchMode::Deliver,
            &FailingNotifier,
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RelayError::Delivery(_)));
    }

    #[tokio::test]
    async fn unrecognized_root_produces_no_payload() {
        let n = CountingNotifier::new();
        let err = process(
            "<rss version=\"2.0\"/>",
            &AssembleOptions::default(),
            DispatchMode::Deliver,
            &n,
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RelayError::UnrecognizedDialect));
        assert_eq!(n.sent.load(Ordering::SeqCst), 0);
    }
}
