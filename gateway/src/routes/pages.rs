use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{session, studio, users};
use crate::middleware::{page_admin_middleware, page_session_middleware};
use crate::state::AppState;

/// Largest accepted voice changer upload.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Server-rendered pages
///
/// Login and logout are public; unauthenticated requests to any other page
/// are redirected to `/login`.
pub fn create_page_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let admin_routes = Router::new()
        .route(
            "/admin/users",
            get(users::admin_page).post(users::create_user_form),
        )
        .route(
            "/admin/users/{username}/delete",
            post(users::delete_user_form),
        )
        .route_layer(middleware::from_fn(page_admin_middleware));

    let protected_routes = Router::new()
        .route("/", get(studio::index))
        .route("/generate", post(studio::generate))
        .route(
            "/convert",
            post(studio::convert).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/history/{id}/audio", get(studio::history_audio))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(
            state,
            page_session_middleware,
        ));

    Router::new()
        .route(
            "/login",
            get(session::login_page).post(session::login_submit),
        )
        .route("/logout", post(session::logout))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
}
