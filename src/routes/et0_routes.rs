use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::et0_controller::{
    compute_epw_day, compute_et0, get_site_et0, health, list_sites,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` and/or `State<Config>` via
/// `FromRef<SharedState>` — a single `.with_state(shared)` covers both.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/et0/compute",      post(compute_et0))
        .route("/et0/epw-day",      post(compute_epw_day))
        .route("/sites",            get(list_sites))
        .route("/sites/{id}/et0",   get(get_site_et0))
        .route("/health",           get(health))
        .with_state(shared)
}
