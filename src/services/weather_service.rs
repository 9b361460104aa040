use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;

use crate::models::et0::{CurrentWeatherResponse, Et0Input};
use crate::services::et0_engine::{self, EngineError};

/// Open-Meteo reports wind at 10 m above ground.
const WIND_SENSOR_HEIGHT_M: f64 = 10.0;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("weather API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather API response is missing field {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// hPa → kPa. Open-Meteo delivers surface pressure in hPa; 1 hPa = 0.1 kPa.
pub fn hpa_to_kpa(pressure_hpa: f64) -> f64 {
    pressure_hpa / 10.0
}

/// Adjust a wind speed measured at `measurement_height_m` above ground to the
/// 2 m reference height via the logarithmic wind profile
/// u2 = uz · 4.87 / ln(67.8·z − 5.42).
pub fn wind_to_2m(speed_m_s: f64, measurement_height_m: f64) -> f64 {
    speed_m_s * 4.87 / (67.8 * measurement_height_m - 5.42).ln()
}

/// Fetch the current conditions for a location and map them to an engine
/// input bundle.
///
/// The API has no sunshine-duration observation; it is estimated from cloud
/// cover as (1 − cloud/100) of the astronomical day length. Elevation is
/// unknown to the API; when the caller cannot supply one, the pressure from
/// the API still resolves the psychrometric constant and the engine flags the
/// clear-sky term as a sea-level approximation.
pub async fn fetch_current_input(
    latitude_deg: f64,
    longitude_deg: f64,
    elevation_m: Option<f64>,
) -> Result<(Et0Input, DateTime<Utc>), WeatherError> {
    let url = format!(
        "https://api.open-meteo.com/v1/forecast?latitude={latitude_deg}&longitude={longitude_deg}&current=temperature_2m,relative_humidity_2m,surface_pressure,wind_speed_10m,cloud_cover&wind_speed_unit=ms"
    );

    let response = reqwest::get(&url).await?;
    let weather = response.json::<CurrentWeatherResponse>().await?;
    let current = weather.current;

    let temperature_c = current
        .temperature_2m
        .ok_or(WeatherError::MissingField("temperature_2m"))?;
    let relative_humidity_pct = current
        .relative_humidity_2m
        .ok_or(WeatherError::MissingField("relative_humidity_2m"))?;
    let surface_pressure_hpa = current
        .surface_pressure
        .ok_or(WeatherError::MissingField("surface_pressure"))?;
    let wind_speed_10m = current
        .wind_speed_10m
        .ok_or(WeatherError::MissingField("wind_speed_10m"))?;
    let cloud_cover_pct = current
        .cloud_cover
        .ok_or(WeatherError::MissingField("cloud_cover"))?;

    // Open-Meteo: "2025-12-28T10:40" → add ":00Z"
    let observed_at = format!("{}:00Z", current.time)
        .parse::<DateTime<Utc>>()
        .unwrap_or_else(|_| Utc::now());
    let day_of_year = observed_at.ordinal() as u16;

    let geometry =
        et0_engine::solar_geometry(f64::from(day_of_year), latitude_deg.to_radians())?;
    let sunshine_duration_hours =
        (1.0 - cloud_cover_pct / 100.0).clamp(0.0, 1.0) * geometry.day_length_h;

    let input = Et0Input {
        mean_temperature_c: temperature_c,
        wind_speed_2m_m_s: wind_to_2m(wind_speed_10m, WIND_SENSOR_HEIGHT_M),
        relative_humidity_pct,
        elevation_m,
        atmospheric_pressure_kpa: Some(hpa_to_kpa(surface_pressure_hpa)),
        latitude_deg,
        day_of_year,
        sunshine_duration_hours,
    };
    Ok((input, observed_at))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pressure_conversion_is_divide_by_ten() {
        assert_eq!(hpa_to_kpa(1013.0), 101.3);
        assert_eq!(hpa_to_kpa(0.0), 0.0);
    }

    #[test]
    fn wind_profile_at_ten_meters() {
        // u2 = u10 · 4.87 / ln(672.58) ≈ u10 · 0.748
        let u2 = wind_to_2m(3.0, 10.0);
        let expected = 3.0 * 4.87 / (67.8 * 10.0 - 5.42_f64).ln();
        assert_eq!(u2, expected);
        assert!((u2 - 2.244).abs() < 0.01, "got {u2}");
    }

    #[test]
    fn wind_at_reference_height_is_unchanged_to_first_order() {
        // ln(67.8·2 − 5.42) = ln(130.18) ≈ 4.869, so the profile factor is ~1
        let u2 = wind_to_2m(3.0, 2.0);
        assert!((u2 - 3.0).abs() < 0.01, "got {u2}");
    }
}
