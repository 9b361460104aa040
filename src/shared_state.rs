use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::extract::FromRef;

use crate::config::Config;
use crate::models::et0::SiteEstimate;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Latest live-weather ET₀ estimate per site id
    pub site_estimates: Arc<RwLock<HashMap<String, SiteEstimate>>>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            site_estimates: Arc::new(RwLock::new(HashMap::new())),
            started_at: Instant::now(),
        }
    }

    pub fn set_estimate(&self, estimate: SiteEstimate) {
        if let Ok(mut map) = self.site_estimates.write() {
            map.insert(estimate.site_id.clone(), estimate);
        }
    }

    pub fn get_estimate(&self, site_id: &str) -> Option<SiteEstimate> {
        if let Ok(map) = self.site_estimates.read() {
            map.get(site_id).cloned()
        } else {
            None
        }
    }

    pub fn sites_online(&self) -> usize {
        self.site_estimates.read().map(|m| m.len()).unwrap_or(0)
    }
}

/// Combined router state. Handlers extract `State<AppState>` and/or
/// `State<Config>` via `FromRef<SharedState>` — a single `.with_state(shared)`
/// covers both.
#[derive(Clone)]
pub struct SharedState {
    pub config: Config,
    pub app: AppState,
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Config {
        shared.config.clone()
    }
}

impl FromRef<SharedState> for AppState {
    fn from_ref(shared: &SharedState) -> AppState {
        shared.app.clone()
    }
}
