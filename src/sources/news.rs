//! News source (NewsAPI `everything` search)

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::endpoint;
use crate::config::SourceCredentials;
use crate::error::FetchError;
use crate::transport::TransportRequest;

/// Display-ready article list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsDigest {
    pub query: String,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    pub published_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

pub(crate) fn build_request(
    query: &str,
    days: i64,
    limit: usize,
    creds: &SourceCredentials,
) -> Result<TransportRequest, FetchError> {
    let api_key = creds.api_key.as_deref().ok_or(FetchError::NoCredentials)?;
    let url = endpoint(&creds.base_url, "everything")?;
    let from = (Utc::now() - Duration::days(days)).format("%Y-%m-%d").to_string();

    Ok(TransportRequest {
        url,
        query: vec![
            ("q".into(), query.to_string()),
            ("language".into(), "en".into()),
            ("from".into(), from),
            ("pageSize".into(), limit.to_string()),
        ],
        headers: vec![("X-Api-Key".into(), api_key.to_string())],
        timeout: creds.timeout,
    })
}

pub(crate) fn parse(query: &str, body: &str, limit: usize) -> Result<NewsDigest, FetchError> {
    let response: NewsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if response.articles.is_empty() {
        return Err(FetchError::Empty);
    }

    let mut articles = Vec::with_capacity(response.articles.len().min(limit));
    for raw in response.articles.into_iter().take(limit) {
        let title = raw
            .title
            .ok_or_else(|| FetchError::Malformed("article missing title".into()))?;
        let published_at = raw
            .published_at
            .ok_or_else(|| FetchError::Malformed("article missing publishedAt".into()))?;

        articles.push(Article {
            title,
            description: raw.description.unwrap_or_default(),
            published_at,
            url: raw.url,
        });
    }

    Ok(NewsDigest {
        query: query.to_string(),
        articles,
    })
}

/// Deterministic sample headlines for the industry-news widget
pub(crate) fn synthetic(query: &str, limit: usize) -> NewsDigest {
    let samples = [
        (
            "Indian Poultry Market Shows Strong Growth",
            "The Indian poultry industry continues to show robust growth with increasing demand for quality protein sources.",
        ),
        (
            "New Technologies in Poultry Farming",
            "Smart farming technologies are revolutionizing the Indian poultry sector.",
        ),
        (
            "Sustainable Practices in Poultry Industry",
            "Indian farmers are adopting eco-friendly practices in poultry farming.",
        ),
    ];

    let today = Utc::now();
    let articles = samples
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, (title, description))| Article {
            title: title.to_string(),
            description: description.to_string(),
            published_at: (today - Duration::days(i as i64)).format("%Y-%m-%d").to_string(),
            url: None,
        })
        .collect();

    NewsDigest {
        query: query.to_string(),
        articles,
    }
}

// ---- API Response Types ----

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<ArticleRaw>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArticleRaw {
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    published_at: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BODY: &str = r#"{
        "status": "ok",
        "articles": [
            {"title": "Broiler prices firm up", "description": "Prices rose this week.",
             "publishedAt": "2026-08-20", "url": "https://example.com/a"},
            {"title": "Feed costs ease", "publishedAt": "2026-08-19"}
        ]
    }"#;

    #[test]
    fn parses_valid_articles() {
        let digest = parse("poultry India", VALID_BODY, 10).unwrap();
        assert_eq!(digest.articles.len(), 2);
        assert_eq!(digest.articles[0].title, "Broiler prices firm up");
        assert_eq!(digest.articles[1].description, "");
        assert!(digest.articles[1].url.is_none());
    }

    #[test]
    fn empty_article_list_is_empty_error() {
        let err = parse("poultry India", r#"{"status": "ok", "articles": []}"#, 10).unwrap_err();
        assert_eq!(err, FetchError::Empty);
    }

    #[test]
    fn article_without_title_is_malformed() {
        let body = r#"{"articles": [{"publishedAt": "2026-08-20"}]}"#;
        assert!(matches!(
            parse("poultry India", body, 10),
            Err(FetchError::Malformed(_))
        ));
    }

    #[test]
    fn synthetic_headlines_are_stable() {
        let a = synthetic("poultry India", 10);
        let b = synthetic("poultry India", 10);
        assert_eq!(a.articles.len(), 3);
        assert_eq!(a.articles[0].title, b.articles[0].title);
    }

    #[test]
    fn build_request_sends_key_as_header() {
        let creds = SourceCredentials::new("https://newsapi.org/v2").with_api_key("nk");
        let request = build_request("poultry India", 30, 10, &creds).unwrap();
        assert!(request.url.as_str().ends_with("/everything"));
        assert!(request
            .headers
            .contains(&("X-Api-Key".to_string(), "nk".to_string())));
        assert!(request
            .query
            .contains(&("language".to_string(), "en".to_string())));
    }
}
