use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Extension,
};
use futures::stream::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::middleware::SessionContext;
use crate::api::routes::{api_error, store_unavailable, ApiError};
use crate::domain::repositories::{GameRepository, SyncError};
use crate::domain::value_objects::Distribution;
use crate::infrastructure::app_state::AppState;
use crate::infrastructure::sync::GameViewUpdate;

const HEARTBEAT: Duration = Duration::from_secs(20);

#[derive(Deserialize)]
pub struct LiveParams {
    /// Restrict the distribution to one seat
    player: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DistributionEvent<'a> {
    distribution: &'a Distribution,
    roll_counts: Vec<u32>,
}

fn json_event(name: &str, data: &impl Serialize) -> Event {
    Event::default()
        .event(name)
        .data(serde_json::to_string(data).unwrap_or_default())
}

fn error_event(e: &SyncError) -> Event {
    let code = match e {
        SyncError::NotFound(_) => "GAME_NOT_FOUND",
        SyncError::Store(_) => "STORE_UNAVAILABLE",
    };
    json_event("error", &json!({ "error": e.to_string(), "code": code }))
}

/// GET /api/games/:gameId/live - Game and ledger snapshots while the
/// connection stays open. Disconnecting releases both subscriptions.
pub async fn game_live_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(game_id): Path<String>,
    Query(params): Query<LiveParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    // Rosters never change, so the seat filter is checked once up front.
    // A missing game is reported on the stream as an error event.
    if let Some(index) = params.player {
        let game = state.game_repo.find_by_id(&game_id).await.map_err(store_unavailable)?;
        if let Some(game) = game.filter(|g| index >= g.player_count()) {
            return Err(api_error(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Player {} is not in this game ({} players)", index, game.player_count()),
            ));
        }
    }

    tracing::debug!("User {} opened live view of game {}", session.user_id, game_id);

    let mut view = state.game_sync.open_game_view(&game_id);
    let player_filter = params.player;

    let stream = async_stream::stream! {
        let mut heartbeat_interval = tokio::time::interval(HEARTBEAT);

        loop {
            tokio::select! {
                _ = heartbeat_interval.tick() => {
                    tracing::trace!("SSE heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }
                update = view.next_update() => {
                    match update {
                        Some(Ok(GameViewUpdate::Game(game))) => {
                            yield Ok(json_event("game", &game));
                        }
                        Some(Ok(GameViewUpdate::Rolls(rolls))) => {
                            yield Ok(json_event("rolls", &rolls));
                            let distribution = view.distribution(player_filter);
                            yield Ok(json_event("distribution", &DistributionEvent {
                                distribution: &distribution,
                                roll_counts: view.roll_counts(),
                            }));
                        }
                        Some(Err(e)) => {
                            tracing::warn!("Live view of game {} ended: {}", view.game_id(), e);
                            yield Ok(error_event(&e));
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        view.close();
        tracing::debug!("Live view of game {} closed", view.game_id());
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// GET /api/games/live - The current user's game list, newest first
pub async fn games_live_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut games = state.game_sync.subscribe_games(&session.user_id);

    let stream = async_stream::stream! {
        let mut heartbeat_interval = tokio::time::interval(HEARTBEAT);

        loop {
            tokio::select! {
                _ = heartbeat_interval.tick() => {
                    yield Ok(Event::default().comment("heartbeat"));
                }
                snapshot = games.next() => {
                    match snapshot {
                        Some(Ok(list)) => yield Ok(json_event("games", &list)),
                        Some(Err(e)) => {
                            tracing::warn!("Game list of {} ended: {}", session.user_id, e);
                            yield Ok(error_event(&e));
                            break;
                        }
                        None => break,
                    }
                }
            }
        }

        games.unsubscribe();
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
