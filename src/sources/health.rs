//! Health source (regional poultry disease alerts)
//!
//! Alerts carry a risk level and containment status per disease and
//! region; the dashboard summarizes them into headline counts.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::endpoint;
use crate::config::SourceCredentials;
use crate::error::FetchError;
use crate::transport::TransportRequest;

/// Display-ready disease report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseReport {
    pub region: String,
    pub alerts: Vec<DiseaseAlert>,
    pub summary: AlertSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseAlert {
    pub date: String,
    pub disease: String,
    pub region: String,
    pub risk_level: RiskLevel,
    pub affected_farms: u32,
    pub status: AlertStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Contained,
    Monitoring,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub total_alerts: usize,
    pub high_risk: usize,
    pub active: usize,
}

impl AlertSummary {
    fn from_alerts(alerts: &[DiseaseAlert]) -> Self {
        Self {
            total_alerts: alerts.len(),
            high_risk: alerts
                .iter()
                .filter(|a| a.risk_level == RiskLevel::High)
                .count(),
            active: alerts
                .iter()
                .filter(|a| a.status == AlertStatus::Active)
                .count(),
        }
    }
}

pub(crate) fn build_request(
    region: &str,
    limit: usize,
    creds: &SourceCredentials,
) -> Result<TransportRequest, FetchError> {
    let api_key = creds.api_key.as_deref().ok_or(FetchError::NoCredentials)?;
    let url = endpoint(&creds.base_url, "alerts")?;

    Ok(TransportRequest {
        url,
        query: vec![
            ("region".into(), region.to_string()),
            ("limit".into(), limit.to_string()),
        ],
        headers: vec![("X-Api-Key".into(), api_key.to_string())],
        timeout: creds.timeout,
    })
}

pub(crate) fn parse(region: &str, body: &str, limit: usize) -> Result<DiseaseReport, FetchError> {
    let response: HealthResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if response.alerts.is_empty() {
        return Err(FetchError::Empty);
    }

    let mut alerts = Vec::with_capacity(response.alerts.len().min(limit));
    for raw in response.alerts.into_iter().take(limit) {
        alerts.push(DiseaseAlert {
            date: raw
                .date
                .ok_or_else(|| FetchError::Malformed("alert missing date".into()))?,
            disease: raw
                .disease
                .ok_or_else(|| FetchError::Malformed("alert missing disease".into()))?,
            region: raw.region.unwrap_or_else(|| region.to_string()),
            risk_level: raw
                .risk_level
                .ok_or_else(|| FetchError::Malformed("alert missing risk_level".into()))?,
            affected_farms: raw.affected_farms.unwrap_or(0),
            status: raw
                .status
                .ok_or_else(|| FetchError::Malformed("alert missing status".into()))?,
        });
    }

    // The remote summary is advisory; recompute so it always matches the
    // alerts actually shown.
    let summary = AlertSummary::from_alerts(&alerts);

    Ok(DiseaseReport {
        region: region.to_string(),
        alerts,
        summary,
    })
}

/// Deterministic sample report covering the last 30 days
pub(crate) fn synthetic(region: &str, limit: usize) -> DiseaseReport {
    const DISEASES: &[&str] = &[
        "Avian Influenza",
        "Newcastle Disease",
        "Infectious Bronchitis",
        "Coccidiosis",
        "Salmonella",
    ];
    const REGIONS: &[&str] = &["North", "South", "East", "West", "Central"];

    let today = Utc::now();
    let mut alerts = Vec::new();

    'outer: for day in 0..30 {
        let date = (today - Duration::days(day)).format("%Y-%m-%d").to_string();
        for disease in DISEASES {
            for candidate in REGIONS {
                if region != "all" && !candidate.eq_ignore_ascii_case(region) {
                    continue;
                }
                let seed = super::mix(&format!("{date}{disease}{candidate}"));
                if seed % 10 >= 3 {
                    continue;
                }
                alerts.push(DiseaseAlert {
                    date: date.clone(),
                    disease: disease.to_string(),
                    region: candidate.to_string(),
                    risk_level: match super::mix(&format!("{date}{disease}")) % 3 {
                        0 => RiskLevel::Low,
                        1 => RiskLevel::Medium,
                        _ => RiskLevel::High,
                    },
                    affected_farms: (seed % 50) as u32,
                    status: match seed % 3 {
                        0 => AlertStatus::Active,
                        1 => AlertStatus::Contained,
                        _ => AlertStatus::Monitoring,
                    },
                });
                if alerts.len() >= limit {
                    break 'outer;
                }
            }
        }
    }

    let summary = AlertSummary::from_alerts(&alerts);

    DiseaseReport {
        region: region.to_string(),
        alerts,
        summary,
    }
}

// ---- API Response Types ----

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    alerts: Vec<AlertRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
struct AlertRaw {
    date: Option<String>,
    disease: Option<String>,
    #[serde(default)]
    region: Option<String>,
    risk_level: Option<RiskLevel>,
    #[serde(default)]
    affected_farms: Option<u32>,
    status: Option<AlertStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BODY: &str = r#"{
        "alerts": [
            {"date": "2026-08-28", "disease": "Newcastle Disease", "region": "North",
             "risk_level": "high", "affected_farms": 12, "status": "active"},
            {"date": "2026-08-27", "disease": "Coccidiosis", "region": "South",
             "risk_level": "low", "affected_farms": 3, "status": "contained"}
        ]
    }"#;

    #[test]
    fn parses_valid_alerts_and_recomputes_summary() {
        let report = parse("all", VALID_BODY, 50).unwrap();
        assert_eq!(report.alerts.len(), 2);
        assert_eq!(report.summary.total_alerts, 2);
        assert_eq!(report.summary.high_risk, 1);
        assert_eq!(report.summary.active, 1);
    }

    #[test]
    fn empty_alert_list_is_empty_error() {
        let err = parse("all", r#"{"alerts": []}"#, 50).unwrap_err();
        assert_eq!(err, FetchError::Empty);
    }

    #[test]
    fn unknown_risk_level_is_malformed() {
        let body = r#"{"alerts": [{"date": "2026-08-28", "disease": "X",
            "risk_level": "catastrophic", "status": "active"}]}"#;
        assert!(matches!(parse("all", body, 50), Err(FetchError::Malformed(_))));
    }

    #[test]
    fn synthetic_report_is_deterministic_apart_from_dates() {
        let a = synthetic("all", 50);
        let b = synthetic("all", 50);
        assert!(!a.alerts.is_empty());
        assert_eq!(a.alerts.len(), b.alerts.len());
        assert_eq!(a.summary.total_alerts, a.alerts.len());
    }

    #[test]
    fn synthetic_respects_region_filter() {
        let report = synthetic("north", 50);
        assert!(report.alerts.iter().all(|a| a.region == "North"));
    }

    #[test]
    fn build_request_carries_region() {
        let creds = SourceCredentials::new("https://api.vetwatch.in/v1").with_api_key("hk");
        let request = build_request("all", 50, &creds).unwrap();
        assert!(request.url.as_str().ends_with("/alerts"));
        assert!(request
            .query
            .contains(&("region".to_string(), "all".to_string())));
    }
}
