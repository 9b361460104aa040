use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::models::et0::{EpwHeader, EpwHourlyRecord, Et0Input};
use crate::services::weather_service::wind_to_2m;

/// EPW wind observations are taken at 10 m above ground.
const EPW_WIND_HEIGHT_M: f64 = 10.0;

#[derive(Error, Debug)]
pub enum EpwError {
    #[error("no hourly records supplied")]
    Empty,
    #[error("expected at most 24 hourly records for one day, got {0}")]
    TooManyRecords(usize),
    #[error("records span more than one calendar day ({0}-{1:02}-{2:02} vs {3}-{4:02}-{5:02})")]
    DateMismatch(i32, u32, u32, i32, u32, u32),
    #[error("invalid calendar date {0}-{1:02}-{2:02}")]
    InvalidDate(i32, u32, u32),
}

/// Aggregate the hourly EPW records of one calendar day into a daily engine
/// input bundle.
///
/// Sunshine duration is estimated as the number of hours with nonzero direct
/// normal radiation; temperature, humidity and wind are daily means, with
/// wind adjusted from the 10 m sensor height to the 2 m reference height.
pub fn daily_input(header: &EpwHeader, records: &[EpwHourlyRecord]) -> Result<Et0Input, EpwError> {
    let first = records.first().ok_or(EpwError::Empty)?;
    if records.len() > 24 {
        return Err(EpwError::TooManyRecords(records.len()));
    }
    for record in records {
        if (record.year, record.month, record.day) != (first.year, first.month, first.day) {
            return Err(EpwError::DateMismatch(
                first.year,
                first.month,
                first.day,
                record.year,
                record.month,
                record.day,
            ));
        }
    }

    let date = NaiveDate::from_ymd_opt(first.year, first.month, first.day)
        .ok_or(EpwError::InvalidDate(first.year, first.month, first.day))?;

    let count = records.len() as f64;
    let mean_temperature_c = records.iter().map(|r| r.dry_bulb_temp_c).sum::<f64>() / count;
    let mean_humidity_pct =
        records.iter().map(|r| r.relative_humidity_pct).sum::<f64>() / count;
    let mean_wind_10m = records.iter().map(|r| r.wind_speed_m_s).sum::<f64>() / count;
    let sunshine_hours = records
        .iter()
        .filter(|r| r.direct_normal_radiation_wh_m2 > 0.0)
        .count() as f64;

    Ok(Et0Input {
        mean_temperature_c,
        wind_speed_2m_m_s: wind_to_2m(mean_wind_10m, EPW_WIND_HEIGHT_M),
        relative_humidity_pct: mean_humidity_pct,
        elevation_m: Some(header.elevation_m),
        atmospheric_pressure_kpa: None,
        latitude_deg: header.latitude_deg,
        day_of_year: date.ordinal() as u16,
        sunshine_duration_hours: sunshine_hours,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> EpwHeader {
        EpwHeader {
            latitude_deg: 45.07,
            longitude_deg: 7.33,
            elevation_m: 239.0,
            time_zone: 1.0,
        }
    }

    fn record(hour_of_day: usize, dni: f64) -> EpwHourlyRecord {
        EpwHourlyRecord {
            year: 2019,
            month: 7,
            day: 6,
            dry_bulb_temp_c: 18.0 + hour_of_day as f64 * 0.5,
            relative_humidity_pct: 60.0,
            wind_speed_m_s: 2.5,
            direct_normal_radiation_wh_m2: dni,
        }
    }

    #[test]
    fn aggregates_one_day_of_records() {
        let records: Vec<_> = (0..24)
            .map(|h| record(h, if (6..=18).contains(&h) { 400.0 } else { 0.0 }))
            .collect();
        let input = daily_input(&header(), &records).unwrap();

        // 13 daylight hours with nonzero DNI
        assert_eq!(input.sunshine_duration_hours, 13.0);
        // mean of 18.0 + h·0.5 over h = 0..24
        assert!((input.mean_temperature_c - 23.75).abs() < 1e-9);
        assert_eq!(input.relative_humidity_pct, 60.0);
        assert_eq!(input.day_of_year, 187);
        assert_eq!(input.elevation_m, Some(239.0));
        assert_eq!(input.latitude_deg, 45.07);
        // 2.5 m/s at 10 m ≈ 1.87 m/s at 2 m
        assert!((input.wind_speed_2m_m_s - 1.87).abs() < 0.01);
    }

    #[test]
    fn empty_record_list_is_rejected() {
        assert!(matches!(daily_input(&header(), &[]), Err(EpwError::Empty)));
    }

    #[test]
    fn mixed_dates_are_rejected() {
        let mut records = vec![record(0, 0.0), record(1, 0.0)];
        records[1].day = 7;
        assert!(matches!(
            daily_input(&header(), &records),
            Err(EpwError::DateMismatch(..))
        ));
    }

    #[test]
    fn leap_day_resolves_to_day_sixty() {
        let mut r = record(0, 0.0);
        r.year = 2020;
        r.month = 2;
        r.day = 29;
        let input = daily_input(&header(), &[r]).unwrap();
        assert_eq!(input.day_of_year, 60);
    }

    #[test]
    fn invalid_calendar_date_is_rejected() {
        let mut r = record(0, 0.0);
        r.month = 2;
        r.day = 30;
        assert!(matches!(
            daily_input(&header(), &[r]),
            Err(EpwError::InvalidDate(..))
        ));
    }
}
