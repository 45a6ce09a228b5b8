//! Weather source (OpenWeather 5-day forecast)
//!
//! The dashboard shows the next 8 three-hour slots for the selected city
//! and flags temperature/humidity ranges that affect poultry health.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::endpoint;
use crate::config::SourceCredentials;
use crate::error::FetchError;
use crate::transport::TransportRequest;

/// Display-ready forecast
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub city: String,
    pub slots: Vec<ForecastSlot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSlot {
    pub at: DateTime<Utc>,
    pub temperature_c: f64,
    pub humidity_percent: f64,
    pub description: String,
}

pub(crate) fn build_request(
    city: &str,
    limit: usize,
    creds: &SourceCredentials,
) -> Result<TransportRequest, FetchError> {
    let api_key = creds.api_key.as_deref().ok_or(FetchError::NoCredentials)?;
    let url = endpoint(&creds.base_url, "forecast")?;

    Ok(TransportRequest {
        url,
        query: vec![
            ("q".into(), format!("{city},IN")),
            ("appid".into(), api_key.to_string()),
            ("units".into(), "metric".into()),
            ("cnt".into(), limit.to_string()),
        ],
        headers: Vec::new(),
        timeout: creds.timeout,
    })
}

pub(crate) fn parse(city: &str, body: &str, limit: usize) -> Result<Forecast, FetchError> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if response.list.is_empty() {
        return Err(FetchError::Empty);
    }

    let mut slots = Vec::with_capacity(response.list.len().min(limit));
    for entry in response.list.into_iter().take(limit) {
        let at = DateTime::from_timestamp(entry.dt, 0)
            .ok_or_else(|| FetchError::Malformed(format!("timestamp {} out of range", entry.dt)))?;
        let description = entry
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| FetchError::Malformed("forecast entry missing weather block".into()))?;

        slots.push(ForecastSlot {
            at,
            temperature_c: entry.main.temp,
            humidity_percent: entry.main.humidity,
            description,
        });
    }

    Ok(Forecast {
        city: city.to_string(),
        slots,
    })
}

/// Deterministic sample forecast for a city
pub(crate) fn synthetic(city: &str, limit: usize) -> Forecast {
    const DESCRIPTIONS: &[&str] = &["clear sky", "partly cloudy", "scattered clouds", "light rain"];

    let seed = super::mix(city);
    let base_temp = 24.0 + (seed % 12) as f64; // 24..36 C depending on city
    let base_humidity = 55.0 + (seed % 25) as f64;
    let start = Utc::now();

    let slots = (0..limit)
        .map(|i| {
            let swing = ((i as f64) * 0.9).sin() * 4.0;
            ForecastSlot {
                at: start + Duration::hours(3 * i as i64),
                temperature_c: ((base_temp + swing) * 10.0).round() / 10.0,
                humidity_percent: (base_humidity + swing * 2.0).clamp(30.0, 95.0).round(),
                description: DESCRIPTIONS[(seed as usize + i) % DESCRIPTIONS.len()].to_string(),
            }
        })
        .collect();

    Forecast {
        city: city.to_string(),
        slots,
    }
}

// ---- API Response Types ----

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: EntryMain,
    #[serde(default)]
    weather: Vec<EntryWeather>,
}

#[derive(Debug, Deserialize)]
struct EntryMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct EntryWeather {
    description: String,
}
