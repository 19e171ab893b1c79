// src/api.rs
//! HTTP surface: the feed trigger endpoint plus health and debug routes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::config::RelayConfig;
use crate::debug;
use crate::error::RelayError;
use crate::notify::Notifier;
use crate::payload::NotificationPayload;
use crate::relay;

#[derive(Clone)]
pub struct AppState {
    config: Arc<RelayConfig>,
    notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(config: RelayConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config: Arc::new(config),
            notifier,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/feed", post(ingest_feed))
        .with_state(state)
        .nest("/debug", debug::router())
        .layer(CorsLayer::very_permissive())
}

/// The external trigger: one raw newswire document per request. Responds
/// with the assembled payload (delivered or not, per configuration).
async fn ingest_feed(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<NotificationPayload>, (StatusCode, Json<Value>)> {
    let outcome = relay::process(
        &body,
        &state.config.assemble_options(),
        state.config.dispatch_mode(),
        state.notifier.as_ref(),
        state.config.debug_payload,
    )
    .await
    .map_err(|err| {
        match err {
            RelayError::Delivery(_) => debug::record_delivery_failure(),
            _ => debug::record_parse_failure(),
        }
        tracing::warn!(error = %err, "invocation failed");
        error_response(&err)
    })?;

    debug::record_invocation(
        outcome.payload.dialect.as_str(),
        outcome.payload.attachments.len(),
        outcome.dropped,
        outcome.delivered,
    );
    Ok(Json(outcome.payload))
}

fn error_response(err: &RelayError) -> (StatusCode, Json<Value>) {
    let status = match err {
        RelayError::Delivery(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(json!({ "error": err.to_string() })))
}
