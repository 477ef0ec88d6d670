use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::warn;

use crate::infra::app_state::AppState;

/// Liveness with a database round trip when one is configured.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, database) = match &state.postgres {
        None => (StatusCode::OK, "disabled"),
        Some(pool) => match castview_core::database::ping(pool).await {
            Ok(()) => (StatusCode::OK, "ok"),
            Err(err) => {
                warn!(error = %err, "health check database ping failed");
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
            }
        },
    };

    let body = json!({
        "status": if status == StatusCode::OK { "ok" } else { "degraded" },
        "database": database,
        "activities_enabled": state.activities.is_enabled(),
        "instances": state.instances.len(),
        "uptime_seconds": (Utc::now() - state.started_at).num_seconds(),
        "version": env!("CARGO_PKG_VERSION"),
    });

    (status, Json(body))
}
