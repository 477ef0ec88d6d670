pub mod v1;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::handlers::{health, overview};

pub const HEALTH: &str = "/health";
pub const OVERVIEW_VIDEOS: &str = "/overview/videos";

/// Create the full application router
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH, get(health::health_handler))
        .route(OVERVIEW_VIDEOS, get(overview::overview_page_handler))
        .merge(create_api_router())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Create the versioned JSON API router
pub fn create_api_router() -> Router<AppState> {
    Router::new().nest("/api/v1", v1::create_v1_router())
}
