//! API Integration Tests for the Dice Tracker backend
//!
//! Drives the HTTP routes against an in-memory store.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tower::{Service, ServiceExt};

use dice_tracker_backend::create_app;
use dice_tracker_backend::infrastructure::app_state::AppState;
use dice_tracker_backend::infrastructure::config::AppConfig;

const SECRET: &str = "test-secret-key";
const WAIT: Duration = Duration::from_secs(2);

/// Helper to create a test application
async fn create_test_app() -> (Router, Arc<AppState>) {
    let state = AppState::from_config(AppConfig::in_memory(SECRET))
        .await
        .expect("Failed to create app state");
    let state = Arc::new(state);

    (create_app(state.clone()), state)
}

fn token_for(state: &AppState, user_id: &str, name: Option<&str>) -> String {
    let token = state.identity.issue(user_id, Some("player@example.com"), name);
    tokio_test::assert_ok!(token)
}

async fn send(app: &mut Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = ServiceExt::<Request<Body>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with auth header
async fn post_json_auth(app: &mut Router, path: &str, body: Value, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Helper to make a GET request with auth header
async fn get_auth(app: &mut Router, path: &str, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Helper to make a POST request with a raw body and no content type
async fn post_raw_auth(app: &mut Router, path: &str, body: &'static str, token: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap();

    send(app, request).await
}

/// Next named server-sent event on a streaming body, skipping comments
async fn next_event(body: &mut Body, buffer: &mut String) -> (String, Value) {
    loop {
        while let Some(end) = buffer.find("\n\n") {
            let block: String = buffer.drain(..end + 2).collect();
            let mut name = None;
            let mut data = String::new();
            for line in block.lines() {
                if let Some(value) = line.strip_prefix("event:") {
                    name = Some(value.trim().to_string());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push_str(value.trim_start());
                }
            }
            if let Some(name) = name {
                return (name, serde_json::from_str(&data).unwrap());
            }
        }

        let frame = tokio::time::timeout(WAIT, body.frame())
            .await
            .expect("timed out waiting for an event")
            .expect("event stream ended")
            .unwrap();
        if let Ok(bytes) = frame.into_data() {
            buffer.push_str(std::str::from_utf8(&bytes).unwrap());
        }
    }
}

async fn create_game(app: &mut Router, token: &str, names: &[&str]) -> Value {
    let players: Vec<Value> = names.iter().map(|n| json!({ "name": n })).collect();
    let (status, body) = post_json_auth(app, "/api/games", json!({ "players": players }), token).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["game"].clone()
}

// ============================================================================
// Health & Session Tests
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (mut app, _) = create_test_app().await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(&mut app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["subscriptions"], 0);
}

#[tokio::test]
async fn test_games_require_auth() {
    let (mut app, _) = create_test_app().await;

    let request = Request::builder().uri("/api/games").body(Body::empty()).unwrap();
    let (status, body) = send(&mut app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let (status, _) = get_auth(&mut app, "/api/games", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_accepted_from_query() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);

    let request = Request::builder()
        .uri(format!("/api/games?token={}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&mut app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["games"], json!([]));
}

#[tokio::test]
async fn test_session_defaults_display_name() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);

    let (status, body) = post_json_auth(&mut app, "/api/session", json!({}), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "u1");
    assert_eq!(body["user"]["displayName"], "Anonymous");
    assert_eq!(body["user"]["email"], "player@example.com");
    assert_eq!(body["user"]["blockedUser"], false);
}

#[tokio::test]
async fn test_blocked_user_is_gated() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", Some("Amy"));

    let (status, _) = post_json_auth(&mut app, "/api/session", json!({}), &token).await;
    assert_eq!(status, StatusCode::OK);

    sqlx::query("UPDATE users SET blocked = 1 WHERE id = 'u1'")
        .execute(&state.db)
        .await
        .unwrap();

    let (status, body) = get_auth(&mut app, "/api/games", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "USER_BLOCKED");

    let (status, body) = get_auth(&mut app, "/api/session", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["blockedUser"], true);
}

// ============================================================================
// Game Tests
// ============================================================================

#[tokio::test]
async fn test_create_game_validation() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);

    let cases = [
        json!({ "players": [{ "name": "Amy" }] }),
        json!({ "players": [{ "name": "Amy" }, { "name": "   " }] }),
        json!({ "players": [{ "name": "Amy" }, { "name": " amy " }] }),
        json!({ "players": [{ "name": "Amy", "color": "pink" }, { "name": "Ben" }] }),
        json!({ "players": [{ "name": "Amy", "color": "teal" }, { "name": "Ben", "color": "#115e59" }] }),
    ];

    for body in cases {
        let (status, response) = post_json_auth(&mut app, "/api/games", body.clone(), &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["code"], "VALIDATION_ERROR");
    }

    let (_, body) = get_auth(&mut app, "/api/games", &token).await;
    assert_eq!(body["games"], json!([]));
}

#[tokio::test]
async fn test_create_game_success() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);

    let game = create_game(&mut app, &token, &[" Amy ", "Ben", "Cal"]).await;
    assert_eq!(game["status"], "active");
    assert_eq!(game["currentPlayerIndex"], 0);
    assert_eq!(game["userId"], "u1");
    assert_eq!(game["players"][0], json!({ "name": "Amy", "color": "blue" }));
    assert_eq!(game["players"][2]["color"], "teal");
}

#[tokio::test]
async fn test_two_player_roll_scenario() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);
    let game = create_game(&mut app, &token, &["A", "B"]).await;
    let id = game["id"].as_str().unwrap();

    let (status, body) = post_json_auth(
        &mut app,
        &format!("/api/games/{}/rolls", id),
        json!({ "expectedPlayerIndex": 0, "die1": 3, "die2": 4 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["roll"]["sum"], 7);
    assert_eq!(body["roll"]["playerIndex"], 0);
    assert_eq!(body["game"]["currentPlayerIndex"], 1);

    let (_, details) = get_auth(&mut app, &format!("/api/games/{}", id), &token).await;
    assert_eq!(details["game"]["currentPlayerIndex"], 1);
    assert_eq!(details["rolls"].as_array().unwrap().len(), 1);
    assert_eq!(details["rolls"][0]["die1"], 3);
    assert_eq!(details["rollCounts"], json!([1, 0]));

    let (status, body) = get_auth(&mut app, &format!("/api/games/{}/distribution", id), &token).await;
    assert_eq!(status, StatusCode::OK);
    let distribution = &body["distribution"];
    assert_eq!(distribution["totalCount"], 1);
    assert_eq!(distribution["actual"]["7"], 1);
    assert_eq!(distribution["actual"]["2"], 0);
    assert_eq!(distribution["expected"]["7"], 0);
    let seven = &distribution["comparisons"][5];
    assert_eq!(seven["sum"], 7);
    assert_eq!(seven["delta"], 1);
    assert_eq!(seven["deviation"], "above");
}

#[tokio::test]
async fn test_stale_expected_player_conflicts() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);
    let game = create_game(&mut app, &token, &["A", "B"]).await;
    let path = format!("/api/games/{}/rolls", game["id"].as_str().unwrap());

    let (status, body) = post_json_auth(
        &mut app,
        &path,
        json!({ "expectedPlayerIndex": 1, "die1": 1, "die2": 1 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "TURN_CONFLICT");

    let (_, rolls) = get_auth(&mut app, &path, &token).await;
    assert_eq!(rolls["rolls"], json!([]));
}

#[tokio::test]
async fn test_server_side_dice() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);
    let game = create_game(&mut app, &token, &["A", "B"]).await;
    let path = format!("/api/games/{}/rolls", game["id"].as_str().unwrap());

    let (status, body) = post_json_auth(&mut app, &path, json!({}), &token).await;
    assert_eq!(status, StatusCode::CREATED);
    let sum = body["roll"]["sum"].as_u64().unwrap();
    assert!((2..=12).contains(&sum));

    let (status, body) = post_json_auth(&mut app, &path, json!({ "die1": 4 }), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = post_json_auth(&mut app, &path, json!({ "die1": 7, "die2": 1 }), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_completed_game_rejects_transitions() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);
    let game = create_game(&mut app, &token, &["A", "B"]).await;
    let id = game["id"].as_str().unwrap();

    let (status, body) = post_json_auth(&mut app, &format!("/api/games/{}/end", id), json!({}), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game"]["status"], "completed");

    let (status, body) = post_json_auth(
        &mut app,
        &format!("/api/games/{}/rolls", id),
        json!({ "die1": 2, "die2": 2 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, body) = post_json_auth(&mut app, &format!("/api/games/{}/end", id), json!({}), &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_unknown_game() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);

    let (status, body) = get_auth(&mut app, "/api/games/nope", &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GAME_NOT_FOUND");

    let (status, body) = post_json_auth(
        &mut app,
        "/api/games/nope/rolls",
        json!({ "die1": 1, "die2": 2 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, body) = post_json_auth(&mut app, "/api/games/nope/end", json!({}), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GAME_NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_roll_body_rejected() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);
    let game = create_game(&mut app, &token, &["A", "B"]).await;
    let path = format!("/api/games/{}/rolls", game["id"].as_str().unwrap());

    let cases = [
        json!({ "expectedPlayerIndex": 0, "die1": 300, "die2": -1 }),
        json!({ "expectedPlayerIndex": "0", "die1": 3, "die2": 4 }),
    ];
    for body in cases {
        let (status, response) = post_json_auth(&mut app, &path, body.clone(), &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(response["code"], "VALIDATION_ERROR");
    }

    let (status, response) = post_raw_auth(&mut app, &path, "die1=3&die2=4", &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_ERROR");

    let (_, rolls) = get_auth(&mut app, &path, &token).await;
    assert_eq!(rolls["rolls"], json!([]));

    // a JSON body without a content type is still read, precondition included
    let (status, response) = post_raw_auth(
        &mut app,
        &path,
        r#"{"expectedPlayerIndex":1,"die1":3,"die2":4}"#,
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["code"], "TURN_CONFLICT");

    let (status, response) = post_raw_auth(
        &mut app,
        &path,
        r#"{"expectedPlayerIndex":0,"die1":3,"die2":4}"#,
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["roll"]["die1"], 3);
    assert_eq!(response["roll"]["die2"], 4);

    // no body at all asks for server dice
    let (status, response) = post_raw_auth(&mut app, &path, "", &token).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["roll"]["playerIndex"], 1);

    let (_, rolls) = get_auth(&mut app, &path, &token).await;
    assert_eq!(rolls["rolls"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_distribution_player_filter() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);
    let game = create_game(&mut app, &token, &["A", "B"]).await;
    let id = game["id"].as_str().unwrap();
    let path = format!("/api/games/{}/rolls", id);

    for (i, (d1, d2)) in [(1, 1), (6, 6), (2, 3)].into_iter().enumerate() {
        let (status, _) = post_json_auth(
            &mut app,
            &path,
            json!({ "expectedPlayerIndex": i % 2, "die1": d1, "die2": d2 }),
            &token,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = get_auth(&mut app, &format!("/api/games/{}/distribution?player=0", id), &token).await;
    assert_eq!(body["distribution"]["playerFilter"], 0);
    assert_eq!(body["distribution"]["totalCount"], 2);
    assert_eq!(body["distribution"]["actual"]["2"], 1);
    assert_eq!(body["distribution"]["actual"]["5"], 1);
    assert_eq!(body["distribution"]["actual"]["12"], 0);
    assert_eq!(body["rollCounts"], json!([2, 1]));

    let (status, _) = get_auth(&mut app, &format!("/api/games/{}/distribution?player=5", id), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_games_newest_first_with_counts() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);
    let other = token_for(&state, "u2", None);

    let first = create_game(&mut app, &token, &["A", "B"]).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = create_game(&mut app, &token, &["C", "D"]).await;
    create_game(&mut app, &other, &["E", "F"]).await;

    let (status, _) = post_json_auth(
        &mut app,
        &format!("/api/games/{}/rolls", first["id"].as_str().unwrap()),
        json!({ "die1": 5, "die2": 5 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = get_auth(&mut app, "/api/games", &token).await;
    let games = body["games"].as_array().unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0]["id"], second["id"]);
    assert_eq!(games[0]["rollCount"], 0);
    assert_eq!(games[1]["id"], first["id"]);
    assert_eq!(games[1]["rollCount"], 1);
}

#[tokio::test]
async fn test_remembered_player_names() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);

    create_game(&mut app, &token, &["amy", "BEN"]).await;
    create_game(&mut app, &token, &["Amy", "Cal"]).await;

    let (status, body) = get_auth(&mut app, "/api/player-names", &token).await;
    assert_eq!(status, StatusCode::OK);
    let names = body["names"].as_array().unwrap();
    assert_eq!(names.len(), 3);
    assert_eq!(names[0]["normalizedName"], "amy");
    assert_eq!(names[0]["displayName"], "Amy");
    assert_eq!(names[0]["usageCount"], 2);
    assert!(names.iter().any(|n| n["displayName"] == "Ben"));
}

// ============================================================================
// Live Stream Tests
// ============================================================================

#[tokio::test]
async fn test_live_game_stream() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);
    let game = create_game(&mut app, &token, &["A", "B"]).await;
    let id = game["id"].as_str().unwrap();

    let request = Request::builder()
        .uri(format!("/api/games/{}/live?token={}", id, token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body();
    let mut buffer = String::new();

    let mut seen = HashSet::new();
    while !(seen.contains("game") && seen.contains("rolls")) {
        let (name, data) = next_event(&mut body, &mut buffer).await;
        match name.as_str() {
            "game" => assert_eq!(data["currentPlayerIndex"], 0),
            "rolls" => assert_eq!(data, json!([])),
            _ => {}
        }
        seen.insert(name);
    }
    assert_eq!(state.tracker.count_for_game(id), 2);

    let (status, _) = post_json_auth(
        &mut app,
        &format!("/api/games/{}/rolls", id),
        json!({ "expectedPlayerIndex": 0, "die1": 3, "die2": 4 }),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    loop {
        let (name, data) = next_event(&mut body, &mut buffer).await;
        if name == "distribution" && data["distribution"]["totalCount"] == 1 {
            assert_eq!(data["distribution"]["actual"]["7"], 1);
            assert_eq!(data["rollCounts"], json!([1, 0]));
            break;
        }
    }

    drop(body);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (_, health) = send(&mut app, request).await;
    assert_eq!(health["subscriptions"], 0);
}

#[tokio::test]
async fn test_live_stream_of_missing_game_reports_error() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);

    let request = Request::builder()
        .uri(format!("/api/games/nope/live?token={}", token))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut body = response.into_body();
    let mut buffer = String::new();
    let (name, data) = next_event(&mut body, &mut buffer).await;
    assert_eq!(name, "error");
    assert_eq!(data["code"], "GAME_NOT_FOUND");

    // the stream ends on its own
    loop {
        let frame = tokio::time::timeout(WAIT, body.frame()).await.unwrap();
        if frame.is_none() {
            break;
        }
    }
    assert_eq!(state.tracker.count(), 0);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (_, health) = send(&mut app, request).await;
    assert_eq!(health["subscriptions"], 0);
}

#[tokio::test]
async fn test_live_stream_rejects_unknown_seat() {
    let (mut app, state) = create_test_app().await;
    let token = token_for(&state, "u1", None);
    let game = create_game(&mut app, &token, &["A", "B"]).await;
    let id = game["id"].as_str().unwrap();

    let (status, body) = get_auth(&mut app, &format!("/api/games/{}/live?player=5", id), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(state.tracker.count(), 0);
}
