use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_refresh_interval_secs() -> u64 { 600 }

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub weather: WeatherConfig,
    pub sites: Vec<SiteConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Seconds between live-weather refreshes per site
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, ToSchema)]
pub struct SiteConfig {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Station elevation (m); unknown for sites defined from coordinates only
    #[serde(default)]
    pub elevation_m: Option<f64>,
    pub timezone: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}
