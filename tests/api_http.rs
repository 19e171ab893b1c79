// tests/api_http.rs
//
// HTTP-level tests for the public Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - POST /feed  (both dialects, non-delivery mode)
// - POST /feed  (unrecognized document -> 400)
// - GET /debug/stats

use std::fs;
use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use newswire_relay::api::{self, AppState};
use newswire_relay::config::RelayConfig;
use newswire_relay::notify::slack::SlackNotifier;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses, in non-delivery mode.
fn test_router() -> Router {
    let config = RelayConfig::default();
    let notifier = Arc::new(SlackNotifier::new(None));
    api::create_router(AppState::new(config, notifier))
}

fn post_feed(xml: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/feed")
        .header("content-type", "text/xml")
        .body(Body::from(xml))
        .expect("build POST /feed")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "OK", "health body should be 'OK'");
}

#[tokio::test]
async fn api_feed_returns_the_assembled_payload() {
    let app = test_router();
    let xml = fs::read_to_string("tests/fixtures/legacy_newsml.xml").expect("fixture");

    let resp = app.oneshot(post_feed(xml)).await.expect("oneshot /feed");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse payload json");

    assert_eq!(v["type"], serde_json::json!("PA"));
    assert!(v["attachments"].is_array());
    assert_eq!(v["attachments"].as_array().unwrap().len(), 2);
    assert_eq!(
        v["attachments"][0]["fallback"],
        serde_json::json!("HEADLINE [4] -- BODY ONE")
    );
}

#[tokio::test]
async fn api_feed_handles_the_g2_dialect() {
    let app = test_router();
    let xml = fs::read_to_string("tests/fixtures/newsml_g2.xml").expect("fixture");

    let resp = app.oneshot(post_feed(xml)).await.expect("oneshot /feed");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse payload json");

    assert_eq!(v["type"], serde_json::json!("Reuters"));
    assert_eq!(
        v["attachments"][0]["fields"][2]["value"],
        serde_json::json!("ABCDEFGH")
    );
}

#[tokio::test]
async fn api_feed_rejects_unrecognized_documents() {
    let app = test_router();
    let xml = fs::read_to_string("tests/fixtures/unknown_dialect.xml").expect("fixture");

    let resp = app.oneshot(post_feed(xml)).await.expect("oneshot /feed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse error json");
    assert!(
        v["error"]
            .as_str()
            .unwrap_or_default()
            .contains("dialect"),
        "error should name the dialect failure, got {v}"
    );
}

#[tokio::test]
async fn api_debug_stats_is_mounted() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/debug/stats")
        .body(Body::empty())
        .expect("build GET /debug/stats");

    let resp = app.oneshot(req).await.expect("oneshot /debug/stats");
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read json")
        .to_vec();
    let v: Json = serde_json::from_slice(&bytes).expect("parse stats json");
    assert!(v.get("total_invocations").is_some());
    assert!(v.get("parse_failures").is_some());
}
