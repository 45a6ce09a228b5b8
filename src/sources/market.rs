//! Market source (data.gov.in commodity-price resource)

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::endpoint;
use crate::config::MarketCredentials;
use crate::error::FetchError;
use crate::transport::TransportRequest;

/// Display-ready price table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTable {
    pub commodity: String,
    pub records: Vec<MarketRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketRecord {
    pub commodity: String,
    pub market: String,
    pub state: String,
    pub price_rs_per_kg: f64,
    pub recorded_on: String,
}

pub(crate) fn build_request(
    commodity: &str,
    limit: usize,
    creds: &MarketCredentials,
) -> Result<TransportRequest, FetchError> {
    let api_key = creds.api_key.as_deref().ok_or(FetchError::NoCredentials)?;
    let resource_id = creds.resource_id.as_deref().ok_or(FetchError::NoCredentials)?;
    let url = endpoint(&creds.base_url, resource_id)?;

    Ok(TransportRequest {
        url,
        query: vec![
            ("api-key".into(), api_key.to_string()),
            ("format".into(), "json".into()),
            ("limit".into(), limit.to_string()),
            ("offset".into(), "0".into()),
            ("filters[commodity]".into(), commodity.to_string()),
        ],
        headers: Vec::new(),
        timeout: creds.timeout,
    })
}

pub(crate) fn parse(commodity: &str, body: &str, limit: usize) -> Result<MarketTable, FetchError> {
    let response: MarketResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if response.records.is_empty() {
        return Err(FetchError::Empty);
    }

    let mut records = Vec::with_capacity(response.records.len().min(limit));
    for raw in response.records.into_iter().take(limit) {
        let price = raw
            .modal_price
            .ok_or_else(|| FetchError::Malformed("record missing modal_price".into()))?
            .parse::<f64>()
            .map_err(|e| FetchError::Malformed(format!("unparseable modal_price: {e}")))?;

        records.push(MarketRecord {
            commodity: raw.commodity.unwrap_or_else(|| commodity.to_string()),
            market: raw
                .market
                .ok_or_else(|| FetchError::Malformed("record missing market".into()))?,
            state: raw.state.unwrap_or_default(),
            price_rs_per_kg: price,
            recorded_on: raw.arrival_date.unwrap_or_default(),
        });
    }

    Ok(MarketTable {
        commodity: commodity.to_string(),
        records,
    })
}

/// Deterministic sample price table
pub(crate) fn synthetic(commodity: &str, limit: usize) -> MarketTable {
    const MARKETS: &[(&str, &str)] = &[
        ("Ghazipur", "Delhi"),
        ("Vashi", "Maharashtra"),
        ("Yeshwanthpur", "Karnataka"),
        ("Bowenpally", "Telangana"),
        ("Koyambedu", "Tamil Nadu"),
    ];

    let seed = super::mix(commodity);
    let base_price = 90.0 + (seed % 60) as f64; // Rs/kg, varies by commodity
    let today = Utc::now();

    let records = MARKETS
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, (market, state))| MarketRecord {
            commodity: commodity.to_string(),
            market: market.to_string(),
            state: state.to_string(),
            price_rs_per_kg: base_price + (super::mix(market) % 15) as f64,
            recorded_on: (today - Duration::days(i as i64 % 3))
                .format("%Y-%m-%d")
                .to_string(),
        })
        .collect();

    MarketTable {
        commodity: commodity.to_string(),
        records,
    }
}

// ---- API Response Types ----

#[derive(Debug, Deserialize)]
struct MarketResponse {
    #[serde(default)]
    records: Vec<MarketRecordRaw>,
}

// data.gov.in serves every field as a string
#[derive(Debug, Deserialize)]
struct MarketRecordRaw {
    #[serde(default)]
    commodity: Option<String>,
    #[serde(default)]
    market: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    modal_price: Option<String>,
    #[serde(default)]
    arrival_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BODY: &str = r#"{
        "records": [
            {"commodity": "Poultry", "market": "Ghazipur", "state": "Delhi",
             "modal_price": "125.50", "arrival_date": "2026-08-28"},
            {"commodity": "Poultry", "market": "Vashi", "state": "Maharashtra",
             "modal_price": "118", "arrival_date": "2026-08-28"}
        ]
    }"#;

    #[test]
    fn parses_valid_records() {
        let table = parse("poultry", VALID_BODY, 100).unwrap();
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].price_rs_per_kg, 125.5);
        assert_eq!(table.records[1].market, "Vashi");
    }

    #[test]
    fn empty_records_is_empty_error() {
        let err = parse("poultry", r#"{"records": []}"#, 100).unwrap_err();
        assert_eq!(err, FetchError::Empty);
    }

    #[test]
    fn unparseable_price_is_malformed() {
        let body = r#"{"records": [{"market": "Ghazipur", "modal_price": "NR"}]}"#;
        assert!(matches!(
            parse("poultry", body, 100),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn missing_market_is_malformed() {
        let body = r#"{"records": [{"modal_price": "120"}]}"#;
        assert!(matches!(
            parse("poultry", body, 100),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn synthetic_prices_are_stable() {
        let a = synthetic("poultry", 100);
        let b = synthetic("poultry", 100);
        assert_eq!(a.records.len(), 5);
        for (x, y) in a.records.iter().zip(&b.records) {
            assert_eq!(x.price_rs_per_kg, y.price_rs_per_kg);
        }
    }

    #[test]
    fn build_request_targets_resource_id() {
        let creds = MarketCredentials::new("https://api.data.gov.in/resource")
            .with_api_key("gk")
            .with_resource_id("abc-123");
        let request = build_request("poultry", 100, &creds).unwrap();
        assert!(request.url.as_str().ends_with("/abc-123"));
        assert!(request
            .query
            .contains(&("api-key".to_string(), "gk".to_string())));
        assert!(request
            .query
            .contains(&("filters[commodity]".to_string(), "poultry".to_string())));
    }

    #[test]
    fn build_request_without_resource_id_is_no_credentials() {
        let creds = MarketCredentials::new("https://api.data.gov.in/resource").with_api_key("gk");
        assert_eq!(
            build_request("poultry", 100, &creds).unwrap_err(),
            FetchError::NoCredentials
        );
    }
}
