pub mod games;
pub mod health;
pub mod player_names;
pub mod session;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{auth_middleware, session_middleware};
use crate::api::sse;
use crate::api::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, code: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
            details: None,
        }),
    )
}

pub(crate) fn store_unavailable(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Store failure: {}", e);
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: "The store is unavailable, try again".to_string(),
            code: "STORE_UNAVAILABLE".to_string(),
            details: Some(e.to_string()),
        }),
    )
}

/// Create the main API router
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/session", create_session_router(state.clone()))
        .nest("/games", create_games_router(state.clone()))
        .route(
            "/player-names",
            get(player_names::list_player_names).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route("/health", get(health::health_handler))
        .with_state(state)
}

/// Create session router
fn create_session_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(session::get_session)
                .post(session::start_session)
                .layer(middleware::from_fn_with_state(state.clone(), session_middleware)),
        )
        .with_state(state)
}

/// Create games router
fn create_games_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(games::list_games).post(games::create_game))
        .route("/live", get(sse::games_live_handler))
        .route("/:gameId", get(games::get_game))
        .route("/:gameId/rolls", get(games::get_rolls).post(games::record_roll))
        .route("/:gameId/end", post(games::end_game))
        .route("/:gameId/distribution", get(games::get_distribution))
        .route("/:gameId/live", get(sse::game_live_handler))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
