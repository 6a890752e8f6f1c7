pub mod api;
pub mod pages;

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::handlers::api::health_check;
use crate::state::AppState;

/// Assemble every route: public health check, pages and the JSON API.
///
/// Cross-cutting layers (CORS, rate limiting, security headers) are added by
/// the binary.
pub fn create_app_router(state: Arc<AppState>) -> Router {
    let api_routes = api::create_api_router(state.clone());
    let page_routes = pages::create_page_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .merge(page_routes)
        .with_state(state)
}
