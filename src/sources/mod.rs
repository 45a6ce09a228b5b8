//! Source-specific query building, response validation, and sample payloads

pub mod health;
pub mod market;
pub mod news;
pub mod weather;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::transport::TransportRequest;

/// Source identifier enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Weather,
    News,
    Market,
    Health,
}

/// Source-specific query parameters
#[derive(Debug, Clone)]
pub enum FetchQuery {
    Weather { city: String },
    News { query: String, days: i64 },
    Market { commodity: String },
    Health { region: String },
}

/// A logical data need, immutable once issued
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub query: FetchQuery,
    pub limit: usize,
}

impl FetchRequest {
    pub fn weather(city: impl Into<String>) -> Self {
        Self {
            query: FetchQuery::Weather { city: city.into() },
            limit: 8,
        }
    }

    pub fn news(query: impl Into<String>) -> Self {
        Self {
            query: FetchQuery::News {
                query: query.into(),
                days: 30,
            },
            limit: 10,
        }
    }

    pub fn market(commodity: impl Into<String>) -> Self {
        Self {
            query: FetchQuery::Market {
                commodity: commodity.into(),
            },
            limit: 100,
        }
    }

    pub fn health(region: impl Into<String>) -> Self {
        Self {
            query: FetchQuery::Health {
                region: region.into(),
            },
            limit: 50,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn kind(&self) -> SourceKind {
        match self.query {
            FetchQuery::Weather { .. } => SourceKind::Weather,
            FetchQuery::News { .. } => SourceKind::News,
            FetchQuery::Market { .. } => SourceKind::Market,
            FetchQuery::Health { .. } => SourceKind::Health,
        }
    }
}

/// Display-ready payload, one typed shape per source kind. The facade
/// passes these through without interpreting them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Payload {
    Weather(weather::Forecast),
    News(news::NewsDigest),
    Market(market::MarketTable),
    Health(health::DiseaseReport),
}

/// Check that the credentials for this request's source are usable.
pub(crate) fn check_credentials(
    request: &FetchRequest,
    config: &FeedConfig,
) -> Result<(), FetchError> {
    let usable = match request.kind() {
        SourceKind::Weather => config.weather.is_usable(),
        SourceKind::News => config.news.is_usable(),
        SourceKind::Market => config.market.is_usable(),
        SourceKind::Health => config.health.is_usable(),
    };
    if usable {
        Ok(())
    } else {
        Err(FetchError::NoCredentials)
    }
}

/// Build the outgoing transport request for one attempt.
pub(crate) fn build_request(
    request: &FetchRequest,
    config: &FeedConfig,
) -> Result<TransportRequest, FetchError> {
    match &request.query {
        FetchQuery::Weather { city } => weather::build_request(city, request.limit, &config.weather),
        FetchQuery::News { query, days } => {
            news::build_request(query, *days, request.limit, &config.news)
        }
        FetchQuery::Market { commodity } => {
            market::build_request(commodity, request.limit, &config.market)
        }
        FetchQuery::Health { region } => health::build_request(region, request.limit, &config.health),
    }
}

/// Parse and validate a 2xx body into a display-ready payload.
pub(crate) fn parse_payload(request: &FetchRequest, body: &str) -> Result<Payload, FetchError> {
    match &request.query {
        FetchQuery::Weather { city } => {
            weather::parse(city, body, request.limit).map(Payload::Weather)
        }
        FetchQuery::News { query, .. } => news::parse(query, body, request.limit).map(Payload::News),
        FetchQuery::Market { commodity } => {
            market::parse(commodity, body, request.limit).map(Payload::Market)
        }
        FetchQuery::Health { region } => {
            health::parse(region, body, request.limit).map(Payload::Health)
        }
    }
}

/// Deterministic sample payload for a request, with the same record fields
/// a live payload would carry.
pub fn synthetic_payload(request: &FetchRequest) -> Payload {
    match &request.query {
        FetchQuery::Weather { city } => Payload::Weather(weather::synthetic(city, request.limit)),
        FetchQuery::News { query, .. } => Payload::News(news::synthetic(query, request.limit)),
        FetchQuery::Market { commodity } => {
            Payload::Market(market::synthetic(commodity, request.limit))
        }
        FetchQuery::Health { region } => Payload::Health(health::synthetic(region, request.limit)),
    }
}

/// Join a configured base URL and a path into a request URL.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, FetchError> {
    let joined = format!("{}/{}", base_url.trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| FetchError::Transport(format!("invalid endpoint {joined}: {e}")))
}

/// Small deterministic hash for sample-data generation (FNV-1a).
pub(crate) fn mix(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in input.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_constructors_pick_dashboard_defaults() {
        let weather = FetchRequest::weather("Delhi");
        assert_eq!(weather.kind(), SourceKind::Weather);
        assert_eq!(weather.limit, 8);

        let news = FetchRequest::news("poultry India");
        assert_eq!(news.kind(), SourceKind::News);
        assert_eq!(news.limit, 10);
        match &news.query {
            FetchQuery::News { days, .. } => assert_eq!(*days, 30),
            other => panic!("unexpected query: {other:?}"),
        }

        let market = FetchRequest::market("poultry").with_limit(25);
        assert_eq!(market.kind(), SourceKind::Market);
        assert_eq!(market.limit, 25);
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let url = endpoint("https://api.example.com/v1/", "forecast").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/forecast");
    }

    #[test]
    fn mix_is_stable_and_input_sensitive() {
        assert_eq!(mix("Delhi"), mix("Delhi"));
        assert_ne!(mix("Delhi"), mix("Mumbai"));
    }
}
