//! Session API endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::models::{Identity, LoginRequest, RegisterRequest, SessionState};
use crate::AppState;

/// GET /api/session - Current session, if any.
pub async fn get_session(State(state): State<AppState>) -> ApiResult<SessionState> {
    success(state.session.current().await.into())
}

/// POST /api/session/login - Start a session.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Identity> {
    let identity = state
        .session
        .login(&request.email, &request.password, request.role)
        .await?;
    success(identity)
}

/// POST /api/session/register - Create an account and start a session.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Identity> {
    let identity = state
        .session
        .register(&request.name, &request.email, &request.password, request.role)
        .await?;
    success(identity)
}

/// POST /api/session/logout - End the session.
pub async fn logout(State(state): State<AppState>) -> ApiResult<SessionState> {
    state.session.logout().await;
    success(SessionState::from(None))
}
