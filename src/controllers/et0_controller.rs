use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::config::{Config, SiteConfig};
use crate::models::et0::{EpwDayRequest, Et0Input, Et0Response, HealthStatus, SiteEstimate};
use crate::services::{epw_service, et0_engine};
use crate::services::et0_engine::EngineError;
use crate::shared_state::AppState;

/// Translate an engine failure into an HTTP response: range/NaN problems are
/// the client's fault (400), math-domain and plausibility failures are
/// reported as 500 with the error kind named in the body.
fn engine_error_response(err: EngineError) -> (StatusCode, Json<serde_json::Value>) {
    let (status, kind) = match &err {
        EngineError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
        EngineError::Domain(_) => (StatusCode::INTERNAL_SERVER_ERROR, "domain"),
        EngineError::ResultOutOfRange(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "result_out_of_range")
        }
    };
    (
        status,
        Json(serde_json::json!({ "kind": kind, "error": err.to_string() })),
    )
}

/// POST /api/et0/compute
/// Compute reference evapotranspiration from a manual parameter bundle
///
/// Runs the FAO-56 Penman-Monteith pipeline on the supplied daily
/// meteorological parameters and returns ET₀ with every intermediate
/// physical quantity.
#[utoipa::path(
    post,
    path = "/api/et0/compute",
    request_body = Et0Input,
    responses(
        (status = 200, description = "Computed estimate", body = Et0Response),
        (status = 400, description = "An input is missing, non-numeric or out of range"),
        (status = 500, description = "Math domain violation or implausible result")
    )
)]
pub async fn compute_et0(Json(input): Json<Et0Input>) -> impl IntoResponse {
    match et0_engine::compute_et0(&input) {
        Ok(estimate) => (
            StatusCode::OK,
            Json(Et0Response {
                timestamp: Utc::now(),
                input,
                estimate,
            }),
        )
            .into_response(),
        Err(err) => engine_error_response(err).into_response(),
    }
}

/// POST /api/et0/epw-day
/// Compute ET₀ for one calendar day of EPW hourly records
///
/// Aggregates the pre-parsed hourly records into a daily parameter bundle
/// (mean temperature/humidity/wind, sunshine hours from nonzero direct
/// normal radiation) and runs the engine on it.
#[utoipa::path(
    post,
    path = "/api/et0/epw-day",
    request_body = EpwDayRequest,
    responses(
        (status = 200, description = "Computed estimate for the day", body = Et0Response),
        (status = 400, description = "Empty or inconsistent record list, or derived input invalid"),
        (status = 500, description = "Math domain violation or implausible result")
    )
)]
pub async fn compute_epw_day(Json(request): Json<EpwDayRequest>) -> impl IntoResponse {
    let input = match epw_service::daily_input(&request.header, &request.records) {
        Ok(input) => input,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "kind": "epw", "error": err.to_string() })),
            )
                .into_response();
        }
    };
    match et0_engine::compute_et0(&input) {
        Ok(estimate) => (
            StatusCode::OK,
            Json(Et0Response {
                timestamp: Utc::now(),
                input,
                estimate,
            }),
        )
            .into_response(),
        Err(err) => engine_error_response(err).into_response(),
    }
}

/// GET /api/sites
/// List all configured sites
#[utoipa::path(
    get,
    path = "/api/sites",
    responses(
        (status = 200, description = "List of configured sites", body = Vec<SiteConfig>)
    )
)]
pub async fn list_sites(State(config): State<Config>) -> impl IntoResponse {
    Json(config.sites).into_response()
}

/// GET /api/sites/{id}/et0
/// Latest live-weather estimate for a configured site
///
/// Returns the most recent cached result of the background refresh. 404 until
/// the first refresh for the site has completed.
#[utoipa::path(
    get,
    path = "/api/sites/{id}/et0",
    params(
        ("id" = String, Path, description = "Site ID")
    ),
    responses(
        (status = 200, description = "Cached estimate", body = SiteEstimate),
        (status = 404, description = "Unknown site or no estimate yet")
    )
)]
pub async fn get_site_et0(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    if let Some(estimate) = state.get_estimate(&id) {
        (StatusCode::OK, Json(estimate)).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Site not found or not refreshed yet" })),
        )
            .into_response()
    }
}

/// GET /api/health
/// Service health and refresh coverage
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn health(
    State(config): State<Config>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        sites_online: state.sites_online(),
        sites_total: config.sites.len(),
    })
    .into_response()
}
