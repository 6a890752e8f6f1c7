use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::CurrentUser;
use crate::errors::auth_error::{AuthError, AuthResult};
use crate::state::AppState;
use crate::utils::{SESSION_COOKIE, cookie_value};
use crate::views;

/// Extract the session token from the request
///
/// Token sources, in order:
/// 1. `Authorization: Bearer <token>` (API clients)
/// 2. `tv_session` cookie (browser pages)
fn extract_token(request: &Request) -> AuthResult<String> {
    if let Some(auth_header) = request.headers().get(AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        return auth_str
            .strip_prefix("Bearer ")
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::InvalidAuthHeader);
    }

    cookie_value(request.headers(), SESSION_COOKIE)
        .map(str::to_string)
        .ok_or(AuthError::MissingToken)
}

/// Resolve the request's session into the calling user.
///
/// The user must still exist in the store; the role is read from the store so
/// changes apply to live sessions.
/// Takes the token by value; no request borrow may live across the session
/// lookups or the middleware future stops being `Send`.
async fn resolve_user(
    state: &AppState,
    token: AuthResult<String>,
) -> AuthResult<CurrentUser> {
    let token = token?;
    let session = state
        .sessions
        .get(&token)
        .await
        .ok_or(AuthError::InvalidSession)?;

    let Some(user) = state.users.get(&session.user.username) else {
        state.sessions.remove(&token).await;
        return Err(AuthError::InvalidSession);
    };

    Ok(CurrentUser {
        token,
        username: user.username,
        role: user.role,
    })
}

/// Session middleware for the JSON API
///
/// Inserts a [`CurrentUser`] into request extensions, or answers 401.
pub async fn session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> AuthResult<Response> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let token = extract_token(&request);
    let user = resolve_user(&state, token).await.inspect_err(|e| {
        tracing::debug!(method = %method, path = %path, error = %e, "API request rejected");
    })?;

    tracing::debug!(method = %method, path = %path, username = %user.username, "Session validated");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Session middleware for server-rendered pages
///
/// Same as [`session_middleware`] but unauthenticated requests are redirected
/// to the login page.
pub async fn page_session_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_token(&request);
    match resolve_user(&state, token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(path = %request.uri().path(), error = %e, "Redirecting to login");
            Redirect::to("/login").into_response()
        }
    }
}

fn is_admin(request: &Request) -> bool {
    request
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(CurrentUser::is_admin)
}

/// Admin gate for API routes. Must run after [`session_middleware`].
pub async fn admin_middleware(request: Request, next: Next) -> AuthResult<Response> {
    if !is_admin(&request) {
        tracing::warn!(path = %request.uri().path(), "Non-admin denied");
        return Err(AuthError::Forbidden);
    }
    Ok(next.run(request).await)
}

/// Admin gate for pages. Must run after [`page_session_middleware`].
pub async fn page_admin_middleware(request: Request, next: Next) -> Response {
    if !is_admin(&request) {
        tracing::warn!(path = %request.uri().path(), "Non-admin denied");
        return (StatusCode::FORBIDDEN, views::forbidden_page()).into_response();
    }
    next.run(request).await
}
