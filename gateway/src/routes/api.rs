use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{session, speak, users, voices};
use crate::middleware::{admin_middleware, session_middleware};
use crate::routes::pages::MAX_UPLOAD_BYTES;
use crate::state::AppState;

/// Body limit for `/api/convert`: a base64-encoded upload of
/// [`MAX_UPLOAD_BYTES`] plus room for the JSON fields.
pub const MAX_CONVERT_BODY_BYTES: usize = MAX_UPLOAD_BYTES.div_ceil(3) * 4 + 64 * 1024;

/// JSON API routes under `/api`
///
/// `/api/login` is public; everything else requires a session, and the user
/// routes also require the admin role.
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let admin_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{username}", delete(users::delete_user))
        .route_layer(middleware::from_fn(admin_middleware));

    let protected_routes = Router::new()
        .route("/logout", post(session::api_logout))
        .route("/voices", get(voices::list_voices))
        .route("/models", get(voices::list_models))
        .route("/speak", post(speak::speak_handler))
        .route(
            "/convert",
            post(speak::convert_handler).layer(DefaultBodyLimit::max(MAX_CONVERT_BODY_BYTES)),
        )
        .route("/history", get(speak::history_handler))
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state, session_middleware));

    Router::new()
        .route("/login", post(session::api_login))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
}
