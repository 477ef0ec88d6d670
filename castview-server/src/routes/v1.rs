use axum::{Router, routing::get};

use crate::{AppState, handlers::overview};

pub const SERIES_VIDEOS: &str = "/series/{series}/videos";

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new().route(SERIES_VIDEOS, get(overview::series_videos_handler))
}
