use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json, Extension};
use serde::Serialize;

use crate::api::middleware::SessionContext;
use crate::api::routes::{api_error, store_unavailable, ApiError};
use crate::api::AppState;
use crate::application::session::{StartSession, StartSessionInput};
use crate::domain::entities::UserProfile;
use crate::domain::repositories::UserRepository;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub user: UserProfile,
}

/// POST /api/session - Record a sign-in from the verified identity
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<SessionResponse>, ApiError> {
    let use_case = StartSession::new(state.user_repo.clone());
    let result = use_case
        .execute(StartSessionInput {
            user_id: session.user_id,
            email: session.email,
            display_name: session.display_name,
        })
        .await
        .map_err(store_unavailable)?;

    Ok(Json(SessionResponse {
        success: true,
        user: result.profile,
    }))
}

/// GET /api/session - Stored profile of the current user
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user = state
        .user_repo
        .find_by_id(&session.user_id)
        .await
        .map_err(store_unavailable)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found"))?;

    Ok(Json(SessionResponse {
        success: true,
        user,
    }))
}
