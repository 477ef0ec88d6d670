use axum::{
    Json,
    extract::{Path, Query, State},
    response::Html,
};
use castview_model::{InstanceId, SeriesId, SeriesOverview};
use serde::Deserialize;
use tracing::{debug, info};

use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult, HtmlError};
use crate::render::render_overview_page;

#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    #[serde(default)]
    pub ocinstanceid: Option<String>,
    #[serde(default)]
    pub series: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InstanceQuery {
    #[serde(default)]
    pub ocinstanceid: Option<String>,
}

fn parse_instance_id(raw: Option<&str>) -> AppResult<Option<InstanceId>> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(|id| Some(InstanceId(id)))
            .map_err(|_| AppError::bad_request(format!("Invalid ocinstanceid: {raw}"))),
    }
}

fn parse_series(raw: Option<&str>) -> AppResult<SeriesId> {
    let raw = raw
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing required parameter: series"))?;
    Ok(SeriesId::parse(raw)?)
}

async fn load_overview(
    state: &AppState,
    requested: Option<InstanceId>,
    series: &SeriesId,
) -> AppResult<SeriesOverview> {
    let service = state.overview_service(requested)?;

    debug!(instance = ?requested, series = %series, "loading series overview");
    let overview = service.load(series).await;

    info!(
        instance = %overview.instance.id,
        series = %series,
        videos = overview.rows.len(),
        notices = overview.notices.len(),
        "series overview loaded"
    );
    Ok(overview)
}

/// Series video overview page
///
/// `GET /overview/videos?ocinstanceid=<int>&series=<id>`
///
/// - `ocinstanceid` is optional and defaults to the default instance
/// - `series` is required and limited to letters, digits, `-` and `_`
///
/// # Response
///
/// - `200 OK` with the HTML overview, including Opencast failures as notices
/// - `400 Bad Request` if `series` is missing or malformed
/// - `404 Not Found` if the instance is not configured
pub async fn overview_page_handler(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Html<String>, HtmlError> {
    let series = parse_series(query.series.as_deref())?;
    let requested = parse_instance_id(query.ocinstanceid.as_deref())?;
    let overview = load_overview(&state, requested, &series).await?;

    Ok(Html(render_overview_page(
        &overview,
        state.has_multiple_instances(),
    )))
}

/// Same overview as JSON.
pub async fn series_videos_handler(
    State(state): State<AppState>,
    Path(series): Path<String>,
    Query(query): Query<InstanceQuery>,
) -> AppResult<Json<SeriesOverview>> {
    let series = parse_series(Some(&series))?;
    let requested = parse_instance_id(query.ocinstanceid.as_deref())?;
    let overview = load_overview(&state, requested, &series).await?;
    Ok(Json(overview))
}
