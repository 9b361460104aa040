use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Engine input ────────────────────────────────────────────────────────────

/// Daily meteorological parameter bundle for the FAO-56 Penman-Monteith
/// equation. One of `elevation_m` / `atmospheric_pressure_kpa` must be given;
/// pressure is derived from elevation when absent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Et0Input {
    /// Mean daily air temperature (°C), valid range [-50, 60]
    pub mean_temperature_c: f64,
    /// Wind speed at 2 m height (m/s), ≥ 0
    pub wind_speed_2m_m_s: f64,
    /// Mean relative humidity (%), [0, 100]
    pub relative_humidity_pct: f64,
    /// Station elevation above sea level (m)
    #[serde(default)]
    pub elevation_m: Option<f64>,
    /// Atmospheric pressure (kPa); derived from elevation when absent
    #[serde(default)]
    pub atmospheric_pressure_kpa: Option<f64>,
    /// Geographic latitude (decimal degrees), [-90, 90]
    pub latitude_deg: f64,
    /// Day of year, [1, 366]
    pub day_of_year: u16,
    /// Actual sunshine duration (h), [0, 24]
    pub sunshine_duration_hours: f64,
}

// ─── Engine output ───────────────────────────────────────────────────────────

/// Every intermediate physical quantity of the calculation chain, reported so
/// clients can display or audit the full radiation / vapor pressure balance.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Intermediates {
    /// Inverse relative distance Earth-Sun (dimensionless)
    pub inverse_relative_distance: f64,
    /// Solar declination (rad)
    pub solar_declination_rad: f64,
    /// Sunset hour angle (rad)
    pub sunset_hour_angle_rad: f64,
    /// Maximum possible daylight duration (h)
    pub day_length_h: f64,
    /// Extraterrestrial radiation Ra (MJ m⁻² day⁻¹)
    pub extraterrestrial_radiation: f64,
    /// Incoming solar radiation Rs (MJ m⁻² day⁻¹)
    pub solar_radiation: f64,
    /// Clear-sky solar radiation Rso (MJ m⁻² day⁻¹)
    pub clear_sky_radiation: f64,
    /// Net shortwave radiation Rns (MJ m⁻² day⁻¹)
    pub net_shortwave: f64,
    /// Net outgoing longwave radiation Rnl (MJ m⁻² day⁻¹)
    pub net_longwave: f64,
    /// Net radiation at the reference surface Rn (MJ m⁻² day⁻¹)
    pub net_radiation: f64,
    /// Saturation vapor pressure es (kPa)
    pub saturation_vapor_pressure: f64,
    /// Actual vapor pressure ea (kPa)
    pub actual_vapor_pressure: f64,
    /// Slope of the saturation vapor pressure curve Δ (kPa/°C)
    pub vapor_pressure_slope: f64,
    /// Psychrometric constant γ (kPa/°C)
    pub psychrometric_constant: f64,
    /// Atmospheric pressure actually used (kPa)
    pub pressure_kpa: f64,
    /// True when the clear-sky term fell back to sea level because the
    /// elevation was unknown
    pub elevation_estimated: bool,
}

/// Result of one engine invocation, created fresh per call and owned by the
/// caller.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Et0Estimate {
    /// Reference evapotranspiration (mm/day)
    pub et0_mm_day: f64,
    pub intermediates: Intermediates,
}

// ─── EPW ingestion types ─────────────────────────────────────────────────────

/// Subset of the EPW header the engine cares about. Parsing the EPW text
/// format itself is the uploader's job; this is the already-decoded result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EpwHeader {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
    pub time_zone: f64,
}

/// One already-decoded hourly EPW record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EpwHourlyRecord {
    pub year: i32,
    /// Month [1, 12]
    pub month: u32,
    /// Day of month [1, 31]
    pub day: u32,
    /// Dry bulb temperature (°C)
    pub dry_bulb_temp_c: f64,
    /// Relative humidity (%)
    pub relative_humidity_pct: f64,
    /// Wind speed at 10 m (m/s)
    pub wind_speed_m_s: f64,
    /// Direct normal radiation (Wh/m²)
    pub direct_normal_radiation_wh_m2: f64,
}

/// Request body for `/api/et0/epw-day`: the hourly records of one calendar
/// day plus the file header.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EpwDayRequest {
    pub header: EpwHeader,
    pub records: Vec<EpwHourlyRecord>,
}

// ─── Open-Meteo wire types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub current: CurrentData,
}

#[derive(Debug, Deserialize)]
pub struct CurrentData {
    pub time: String,
    pub temperature_2m: Option<f64>,
    pub relative_humidity_2m: Option<f64>,
    /// hPa as delivered by the API
    pub surface_pressure: Option<f64>,
    /// m/s (the request asks for wind_speed_unit=ms)
    pub wind_speed_10m: Option<f64>,
    /// Total cloud cover (%)
    pub cloud_cover: Option<f64>,
}

// ─── REST API response types ──────────────────────────────────────────────────

/// Computation response for the manual and EPW endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct Et0Response {
    pub timestamp: DateTime<Utc>,
    /// The fully resolved input the engine ran on
    pub input: Et0Input,
    pub estimate: Et0Estimate,
}

/// Latest live-weather estimate cached for a configured site.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SiteEstimate {
    pub site_id: String,
    /// Observation time reported by the weather API
    pub observed_at: DateTime<Utc>,
    /// When the background refresh stored this entry
    pub refreshed_at: DateTime<Utc>,
    pub input: Et0Input,
    pub estimate: Et0Estimate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub sites_online: usize,
    pub sites_total: usize,
}
