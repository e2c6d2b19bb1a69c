use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::api::routes::ErrorResponse;
use crate::application::session::{StartSession, StartSessionInput};
use crate::domain::repositories::UserRepository;
use crate::infrastructure::app_state::AppState;
use crate::infrastructure::auth::Claims;

/// Authenticated caller, passed to handlers through request extensions
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub blocked: bool,
}

impl SessionContext {
    fn from_claims(claims: Claims, blocked: bool) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            display_name: claims.name,
            blocked,
        }
    }
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Bearer header, or `?token=` for event streams that cannot set headers
fn extract_token(request: &Request) -> Option<String> {
    let from_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(request.uri())
            .ok()
            .and_then(|Query(q)| q.token)
    })
}

fn reject(status: StatusCode, code: &str, error: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
            details: None,
        }),
    )
        .into_response()
}

async fn authenticate(state: &AppState, token: Option<String>) -> Result<SessionContext, Response> {
    let token = token
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", "Missing token"))?;

    let claims = state.identity.verify(&token).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        reject(StatusCode::UNAUTHORIZED, "UNAUTHENTICATED", "Invalid token")
    })?;

    let stored = state.user_repo.find_by_id(&claims.sub).await.map_err(|e| {
        tracing::error!("Failed to load user {}: {}", claims.sub, e);
        reject(StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", "Store unavailable")
    })?;

    let blocked = match stored {
        Some(profile) => profile.blocked,
        None => {
            // First request from this identity: create the profile
            let use_case = StartSession::new(state.user_repo.clone());
            let output = use_case
                .execute(StartSessionInput {
                    user_id: claims.sub.clone(),
                    email: claims.email.clone(),
                    display_name: claims.name.clone(),
                })
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create user {}: {}", claims.sub, e);
                    reject(StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE", "Store unavailable")
                })?;
            output.profile.blocked
        }
    };

    Ok(SessionContext::from_claims(claims, blocked))
}

/// Require an authenticated, non-blocked user
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token(&request);
    let session = authenticate(&state, token).await?;

    if session.blocked {
        tracing::warn!("Blocked user {} denied {}", session.user_id, request.uri().path());
        return Err(reject(StatusCode::FORBIDDEN, "USER_BLOCKED", "User is blocked"));
    }

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Require an authenticated user, blocked or not (session routes only)
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token(&request);
    let session = authenticate(&state, token).await?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
