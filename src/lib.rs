pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::infrastructure::app_state::AppState;

/// Requests that take longer than this are answered with 408.
/// Event streams are unaffected once their headers are sent.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the full HTTP application
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api::routes::create_api_router(state.clone()))
        .route("/health", get(api::routes::health::health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
