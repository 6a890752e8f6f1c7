//! User management, admin only.

use std::sync::Arc;

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::auth::{CurrentUser, Role, UserInfo};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;
use crate::views::{self, AdminView, Notice};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<String>,
}

fn create(state: &AppState, admin: &CurrentUser, request: &CreateUserRequest) -> AppResult<UserInfo> {
    let role = match request.role.as_deref() {
        None | Some("") => Role::User,
        Some(raw) => {
            Role::parse(raw).ok_or_else(|| AppError::Validation(format!("Unknown role '{raw}'")))?
        }
    };

    let user = state
        .users
        .create_user(&request.username, &request.password, role)?;
    info!(admin = %admin.username, username = %user.username, role = %user.role, "User created");
    Ok(user)
}

/// Delete a user and end their sessions. Returns how many sessions were ended.
async fn delete(state: &AppState, admin: &CurrentUser, username: &str) -> AppResult<usize> {
    let removed = state.users.delete_user(username)?;
    let ended = state.sessions.remove_user(&removed.username).await;
    info!(
        admin = %admin.username,
        username = %removed.username,
        sessions_ended = ended,
        "User deleted"
    );
    Ok(ended)
}

// =============================================================================
// Pages
// =============================================================================

fn render_admin(state: &AppState, admin: &CurrentUser, status: StatusCode, notices: Vec<Notice>) -> Response {
    let users = state.users.list_users();
    let page = views::admin_page(&AdminView {
        username: &admin.username,
        users: &users,
        protected: state.users.seed_admin(),
        notices,
    });
    (status, page).into_response()
}

/// GET /admin/users
pub async fn admin_page(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentUser>,
) -> Response {
    render_admin(&state, &admin, StatusCode::OK, Vec::new())
}

/// POST /admin/users
pub async fn create_user_form(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentUser>,
    Form(request): Form<CreateUserRequest>,
) -> Response {
    match create(&state, &admin, &request) {
        Ok(user) => render_admin(
            &state,
            &admin,
            StatusCode::OK,
            vec![Notice::Success(format!("User '{}' created", user.username))],
        ),
        Err(e) => render_admin(&state, &admin, e.status_code(), vec![Notice::Error(e.to_string())]),
    }
}

/// POST /admin/users/{username}/delete
pub async fn delete_user_form(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> Response {
    match delete(&state, &admin, &username).await {
        Ok(_) => render_admin(
            &state,
            &admin,
            StatusCode::OK,
            vec![Notice::Success(format!("User '{username}' deleted"))],
        ),
        Err(e) => render_admin(&state, &admin, e.status_code(), vec![Notice::Error(e.to_string())]),
    }
}

// =============================================================================
// JSON API
// =============================================================================

/// GET /api/users
pub async fn list_users(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "users": state.users.list_users() }))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentUser>,
    Json(request): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    let user = create(&state, &admin, &request)?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// DELETE /api/users/{username}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(admin): Extension<CurrentUser>,
    Path(username): Path<String>,
) -> AppResult<Json<Value>> {
    let ended = delete(&state, &admin, &username).await?;
    Ok(Json(json!({ "deleted": username, "sessions_ended": ended })))
}
