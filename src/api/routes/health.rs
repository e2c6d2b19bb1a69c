use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
    /// Open live subscriptions
    subscriptions: usize,
    change_listeners: usize,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let uptime = (chrono::Utc::now().timestamp() - state.started_at).max(0) as u64;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        subscriptions: state.tracker.count(),
        change_listeners: state.feed.listener_count(),
    })
}
