use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::SessionContext;
use crate::api::routes::{api_error, store_unavailable, ApiError};
use crate::api::AppState;
use crate::application::game::{
    CreateGame, CreateGameError, CreateGameInput, EndGame, EndGameError, EndGameInput,
    GameSummary, GetDistribution, GetDistributionError, GetDistributionInput, GetGame,
    GetGameError, GetGameInput, ListGames, ListGamesInput, RecordRollAndAdvance,
    RecordRollError, RecordRollInput, RosterEntryInput,
};
use crate::domain::entities::{Game, Roll};
use crate::domain::errors::TransitionError;
use crate::domain::value_objects::Distribution;

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RosterEntryRequest {
    pub name: String,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub players: Vec<RosterEntryRequest>,
    #[serde(default)]
    pub randomize_start: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRollRequest {
    pub expected_player_index: Option<usize>,
    pub die1: Option<u8>,
    pub die2: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct DistributionQuery {
    pub player: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub success: bool,
    pub game: Game,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameListItem {
    #[serde(flatten)]
    pub game: Game,
    pub roll_count: u32,
}

impl From<GameSummary> for GameListItem {
    fn from(summary: GameSummary) -> Self {
        Self {
            game: summary.game,
            roll_count: summary.roll_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListGamesResponse {
    pub success: bool,
    pub games: Vec<GameListItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDetailsResponse {
    pub success: bool,
    pub game: Game,
    pub rolls: Vec<Roll>,
    pub roll_counts: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct RollsResponse {
    pub success: bool,
    pub rolls: Vec<Roll>,
}

#[derive(Debug, Serialize)]
pub struct RecordRollResponse {
    pub success: bool,
    pub roll: Roll,
    pub game: Game,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResponse {
    pub success: bool,
    pub distribution: Distribution,
    pub roll_counts: Vec<u32>,
}

// ============================================================================
// Error mapping
// ============================================================================

fn game_not_found(id: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", format!("Game {} not found", id))
}

/// An empty body asks for server-side dice. Anything else must parse.
fn parse_roll_request(body: &[u8]) -> Result<RecordRollRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RecordRollRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Invalid roll request: {}", e),
        )
    })
}

fn transition_error(e: &TransitionError) -> ApiError {
    match e {
        TransitionError::InvalidTransition { .. } => {
            api_error(StatusCode::CONFLICT, "INVALID_TRANSITION", e.to_string())
        }
        TransitionError::PlayerIndexOutOfRange { .. } => {
            api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/games - Games of the current user, newest first
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ListGamesResponse>, ApiError> {
    let use_case = ListGames::new(state.game_repo.clone());
    let result = use_case
        .execute(ListGamesInput {
            owner_id: session.user_id,
        })
        .await
        .map_err(store_unavailable)?;

    Ok(Json(ListGamesResponse {
        success: true,
        games: result.games.into_iter().map(GameListItem::from).collect(),
    }))
}

/// POST /api/games - Create a game from a roster
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let use_case = CreateGame::new(
        state.game_repo.clone(),
        state.player_name_repo.clone(),
        state.randomizer.clone(),
    );
    let result = use_case
        .execute(CreateGameInput {
            owner_id: session.user_id,
            players: body
                .players
                .into_iter()
                .map(|p| RosterEntryInput {
                    name: p.name,
                    color: p.color,
                })
                .collect(),
            randomize_start: body.randomize_start,
        })
        .await
        .map_err(|e| match e {
            CreateGameError::Validation(e) => {
                api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            CreateGameError::Sync(e) => store_unavailable(e),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(GameResponse {
            success: true,
            game: result.game,
        }),
    ))
}

/// GET /api/games/:gameId - Game with its ledger
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameDetailsResponse>, ApiError> {
    let use_case = GetGame::new(state.game_repo.clone());
    let result = use_case
        .execute(GetGameInput { game_id })
        .await
        .map_err(|e| match e {
            GetGameError::GameNotFound(id) => game_not_found(&id),
            GetGameError::Sync(e) => store_unavailable(e),
        })?;

    Ok(Json(GameDetailsResponse {
        success: true,
        game: result.game,
        rolls: result.rolls,
        roll_counts: result.roll_counts,
    }))
}

/// GET /api/games/:gameId/rolls - Ledger, ascending
pub async fn get_rolls(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<RollsResponse>, ApiError> {
    let use_case = GetGame::new(state.game_repo.clone());
    let result = use_case
        .execute(GetGameInput { game_id })
        .await
        .map_err(|e| match e {
            GetGameError::GameNotFound(id) => game_not_found(&id),
            GetGameError::Sync(e) => store_unavailable(e),
        })?;

    Ok(Json(RollsResponse {
        success: true,
        rolls: result.rolls,
    }))
}

/// POST /api/games/:gameId/rolls - Record a roll and pass the turn
pub async fn record_roll(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<RecordRollResponse>), ApiError> {
    let body = parse_roll_request(&body)?;

    let use_case = RecordRollAndAdvance::new(state.game_repo.clone(), state.randomizer.clone());
    let result = use_case
        .execute(RecordRollInput {
            game_id,
            expected_player_index: body.expected_player_index,
            die1: body.die1,
            die2: body.die2,
        })
        .await
        .map_err(|e| match &e {
            RecordRollError::Validation(v) => {
                api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", v.to_string())
            }
            RecordRollError::Transition(t) => transition_error(t),
            RecordRollError::Conflict { .. } => {
                api_error(StatusCode::CONFLICT, "TURN_CONFLICT", e.to_string())
            }
            RecordRollError::Sync(s) => store_unavailable(s),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(RecordRollResponse {
            success: true,
            roll: result.roll,
            game: result.game,
        }),
    ))
}

/// POST /api/games/:gameId/end - Complete the game
pub async fn end_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let use_case = EndGame::new(state.game_repo.clone());
    let result = use_case
        .execute(EndGameInput { game_id })
        .await
        .map_err(|e| match e {
            EndGameError::GameNotFound(id) => game_not_found(&id),
            EndGameError::Transition(t) => transition_error(&t),
            EndGameError::Sync(s) => store_unavailable(s),
        })?;

    Ok(Json(GameResponse {
        success: true,
        game: result.game,
    }))
}

/// GET /api/games/:gameId/distribution?player=N - Actual vs expected sums
pub async fn get_distribution(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Query(query): Query<DistributionQuery>,
) -> Result<Json<DistributionResponse>, ApiError> {
    let use_case = GetDistribution::new(state.game_repo.clone());
    let result = use_case
        .execute(GetDistributionInput {
            game_id,
            player_filter: query.player,
        })
        .await
        .map_err(|e| match e {
            GetDistributionError::GameNotFound(id) => game_not_found(&id),
            GetDistributionError::InvalidPlayer { .. } => {
                api_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string())
            }
            GetDistributionError::Sync(s) => store_unavailable(s),
        })?;

    Ok(Json(DistributionResponse {
        success: true,
        distribution: result.distribution,
        roll_counts: result.roll_counts,
    }))
}
