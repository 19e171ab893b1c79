// src/debug.rs
//! Debug side channel: an in-memory ring buffer of recent invocations plus
//! aggregate counters, served under `/debug`. Not part of the
//! transformation contract.

use std::{collections::VecDeque, sync::Mutex};

use axum::{extract::Query, routing::get, Json, Router};
use chrono::Utc;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

const HISTORY_CAP: usize = 200;

#[derive(Clone, Serialize, Deserialize)]
pub struct Invocation {
    /// RFC 3339 UTC timestamp.
    pub at: String,
    pub dialect: String,
    pub attachments: usize,
    pub dropped: usize,
    pub delivered: bool,
}

#[derive(Default, Clone, Serialize)]
pub struct Stats {
    pub total_invocations: u64,
    pub delivered: u64,
    pub returned: u64,
    pub parse_failures: u64,
    pub delivery_failures: u64,
}

static HISTORY: Lazy<Mutex<VecDeque<Invocation>>> =
    Lazy::new(|| Mutex::new(VecDeque::with_capacity(HISTORY_CAP)));
static STATS: Lazy<Mutex<Stats>> = Lazy::new(|| Mutex::new(Stats::default()));

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub fn router() -> Router {
    Router::new()
        .route("/history", get(history))
        .route("/stats", get(stats))
}

pub fn record_invocation(dialect: &str, attachments: usize, dropped: usize, delivered: bool) {
    let mut h = HISTORY.lock().unwrap();
    if h.len() >= HISTORY_CAP {
        h.pop_front();
    }
    h.push_back(Invocation {
        at: Utc::now().to_rfc3339(),
        dialect: dialect.to_string(),
        attachments,
        dropped,
        delivered,
    });

    let mut s = STATS.lock().unwrap();
    s.total_invocations += 1;
    if delivered {
        s.delivered += 1;
    } else {
        s.returned += 1;
    }
}

pub fn record_parse_failure() {
    let mut s = STATS.lock().unwrap();
    s.total_invocations += 1;
    s.parse_failures += 1;
}

pub fn record_delivery_failure() {
    let mut s = STATS.lock().unwrap();
    s.total_invocations += 1;
    s.delivery_failures += 1;
}

async fn history(Query(q): Query<HistoryQuery>) -> Json<Vec<Invocation>> {
    let limit = q.limit.unwrap_or(50);
    let h = HISTORY.lock().unwrap();
    let len = h.len();
    let start = len.saturating_sub(limit);
    Json(h.iter().skip(start).cloned().collect())
}

async fn stats() -> Json<Stats> {
    Json(STATS.lock().unwrap().clone())
}
