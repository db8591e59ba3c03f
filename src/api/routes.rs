use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::handlers::{get_periods, get_view, health_check, list_sites, refresh, AppState};

pub fn create_api_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/sites", get(list_sites))
        .route("/sites/{tag}/periods", get(get_periods))
        .route("/sites/{tag}/views/{period}", get(get_view))
        .route("/refresh", post(refresh))
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
