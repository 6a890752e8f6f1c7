//! Login and logout.

use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::auth::{CurrentUser, Role};
use crate::errors::{AppResult, AuthError};
use crate::state::AppState;
use crate::utils::{SESSION_COOKIE, clear_session_cookie, cookie_value, session_cookie};
use crate::views;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
}

/// Check credentials and open a session.
async fn open_session(state: &AppState, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
    let Some(user) = state.users.authenticate(&request.username, &request.password) else {
        warn!(username = %request.username.trim(), "Login failed");
        return Err(AuthError::InvalidCredentials);
    };

    info!(username = %user.username, role = %user.role, "Login succeeded");
    let username = user.username.clone();
    let role = user.role;
    let token = state.sessions.create(user).await;

    Ok(LoginResponse {
        token,
        username,
        role,
    })
}

// =============================================================================
// Pages
// =============================================================================

/// GET /login
pub async fn login_page(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE) {
        if state.sessions.get(token).await.is_some() {
            return Redirect::to("/").into_response();
        }
    }
    views::login_page(None, "").into_response()
}

/// POST /login
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(request): Form<LoginRequest>,
) -> Response {
    match open_session(&state, &request).await {
        Ok(session) => {
            let cookie = session_cookie(&session.token, state.secure_cookies());
            ([(SET_COOKIE, cookie)], Redirect::to("/")).into_response()
        }
        Err(e) => (
            e.status_code(),
            views::login_page(Some(&e.to_string()), request.username.trim()),
        )
            .into_response(),
    }
}

/// POST /logout
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(token) = cookie_value(&headers, SESSION_COOKIE) {
        state.sessions.remove(token).await;
    }
    ([(SET_COOKIE, clear_session_cookie())], Redirect::to("/login")).into_response()
}

// =============================================================================
// JSON API
// =============================================================================

/// POST /api/login
pub async fn api_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let session = open_session(&state, &request).await?;
    Ok(Json(session))
}

/// POST /api/logout
pub async fn api_logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> (StatusCode, Json<Value>) {
    state.sessions.remove(&user.token).await;
    info!(username = %user.username, "Logged out");
    (StatusCode::OK, Json(json!({ "status": "logged_out" })))
}
