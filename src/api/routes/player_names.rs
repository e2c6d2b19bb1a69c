use std::sync::Arc;

use axum::{extract::State, response::Json, Extension};
use serde::Serialize;

use crate::api::middleware::SessionContext;
use crate::api::routes::{store_unavailable, ApiError};
use crate::api::AppState;
use crate::application::player_names::ListPlayerNames;
use crate::domain::entities::RememberedPlayerName;

#[derive(Debug, Serialize)]
pub struct PlayerNamesResponse {
    pub success: bool,
    pub names: Vec<RememberedPlayerName>,
}

/// GET /api/player-names - Remembered names, most used first
pub async fn list_player_names(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<PlayerNamesResponse>, ApiError> {
    let use_case = ListPlayerNames::new(state.player_name_repo.clone());
    let names = use_case
        .execute(&session.user_id)
        .await
        .map_err(store_unavailable)?;

    Ok(Json(PlayerNamesResponse {
        success: true,
        names,
    }))
}
