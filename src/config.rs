//! Feed configuration
//!
//! API keys and base URLs per source, resolved once at process start from
//! environment variables and then injected into the facade. A missing or
//! placeholder key is a supported state, not an error: that source serves
//! sample data without touching the network.

use std::time::Duration;

const WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const NEWS_BASE_URL: &str = "https://newsapi.org/v2";
const MARKET_BASE_URL: &str = "https://api.data.gov.in/resource";
const HEALTH_BASE_URL: &str = "https://api.vetwatch.in/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Key values that mean "never actually configured"
const PLACEHOLDER_KEYS: &[&str] = &["dummy", "changeme", "your-api-key", "sample", "none"];

/// Credentials for one remote source
#[derive(Debug, Clone)]
pub struct SourceCredentials {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl SourceCredentials {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// A source is usable only with a real (non-placeholder) key.
    pub fn is_usable(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Credentials for the data.gov.in market endpoint, which needs a resource
/// id in addition to the key.
#[derive(Debug, Clone)]
pub struct MarketCredentials {
    pub api_key: Option<String>,
    pub resource_id: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl MarketCredentials {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_key: None,
            resource_id: None,
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn is_usable(&self) -> bool {
        self.api_key.is_some() && self.resource_id.is_some()
    }
}

/// Full feed configuration, one credentials block per source kind
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub weather: SourceCredentials,
    pub news: SourceCredentials,
    pub market: MarketCredentials,
    pub health: SourceCredentials,
}

impl FeedConfig {
    /// Configuration with no keys at all; every source serves sample data.
    pub fn offline() -> Self {
        Self {
            weather: SourceCredentials::new(WEATHER_BASE_URL),
            news: SourceCredentials::new(NEWS_BASE_URL),
            market: MarketCredentials::new(MARKET_BASE_URL),
            health: SourceCredentials::new(HEALTH_BASE_URL),
        }
    }

    /// Resolve configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::offline();

        config.weather.api_key = resolve_key("WEATHER_API_KEY");
        config.news.api_key = resolve_key("NEWS_API_KEY");
        config.market.api_key = resolve_key("DATA_GOV_API_KEY");
        config.market.resource_id = resolve_key("DATA_GOV_RESOURCE_ID");
        config.health.api_key = resolve_key("HEALTH_API_KEY");

        if let Some(url) = resolve_url("WEATHER_API_URL") {
            config.weather.base_url = url;
        }
        if let Some(url) = resolve_url("NEWS_API_URL") {
            config.news.base_url = url;
        }
        if let Some(url) = resolve_url("MARKET_API_URL") {
            config.market.base_url = url;
        }
        if let Some(url) = resolve_url("HEALTH_API_URL") {
            config.health.base_url = url;
        }

        config
    }
}

fn resolve_key(var: &str) -> Option<String> {
    let raw = std::env::var(var).ok()?;
    clean_key(&raw)
}

fn resolve_url(var: &str) -> Option<String> {
    let raw = std::env::var(var).ok()?;
    let cleaned = raw.trim().trim_end_matches('/');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Clean a key value (remove quotes, whitespace) and reject placeholders.
fn clean_key(raw: &str) -> Option<String> {
    let mut value = raw.trim().to_string();

    // Remove surrounding quotes
    if (value.starts_with('"') && value.ends_with('"') && value.len() >= 2)
        || (value.starts_with('\'') && value.ends_with('\'') && value.len() >= 2)
    {
        value = value[1..value.len() - 1].to_string();
    }

    let value = value.trim().to_string();
    if value.is_empty() {
        return None;
    }

    let lowered = value.to_lowercase();
    if PLACEHOLDER_KEYS.iter().any(|p| lowered == *p) {
        return None;
    }

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env_var<F>(key: &str, value: Option<&str>, f: F)
    where
        F: FnOnce(),
    {
        let _guard = ENV_LOCK.lock().expect("env lock");
        let previous = env::var(key).ok();

        match value {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }

        f();

        match previous {
            Some(value) => env::set_var(key, value),
            None => env::remove_var(key),
        }
    }

    #[test]
    fn clean_key_strips_quotes_and_whitespace() {
        assert_eq!(clean_key("  'abc123'  ").as_deref(), Some("abc123"));
        assert_eq!(clean_key("\"k\"").as_deref(), Some("k"));
    }

    #[test]
    fn clean_key_rejects_placeholders() {
        assert_eq!(clean_key(""), None);
        assert_eq!(clean_key("   "), None);
        assert_eq!(clean_key("dummy"), None);
        assert_eq!(clean_key("ChangeMe"), None);
        assert_eq!(clean_key("'your-api-key'"), None);
    }

    #[test]
    fn market_needs_both_key_and_resource_id() {
        let mut market = MarketCredentials::new(MARKET_BASE_URL);
        assert!(!market.is_usable());
        market.api_key = Some("k".into());
        assert!(!market.is_usable());
        market.resource_id = Some("r".into());
        assert!(market.is_usable());
    }

    #[test]
    fn from_env_picks_up_weather_key() {
        with_env_var("WEATHER_API_KEY", Some("  real-key  "), || {
            let config = FeedConfig::from_env();
            assert_eq!(config.weather.api_key.as_deref(), Some("real-key"));
            assert!(config.weather.is_usable());
        });
    }

    #[test]
    fn from_env_treats_placeholder_as_absent() {
        with_env_var("NEWS_API_KEY", Some("dummy"), || {
            let config = FeedConfig::from_env();
            assert!(!config.news.is_usable());
        });
    }

    #[test]
    fn offline_config_has_default_base_urls() {
        let config = FeedConfig::offline();
        assert_eq!(config.weather.base_url, WEATHER_BASE_URL);
        assert_eq!(config.news.base_url, NEWS_BASE_URL);
        assert_eq!(config.market.base_url, MARKET_BASE_URL);
        assert!(!config.weather.is_usable());
    }
}
