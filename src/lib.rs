//! CoopFeed - resilient data feeds for a poultry farm dashboard
//!
//! Wraps the third-party weather, news, market-price, and disease-alert
//! APIs behind a single fetch facade that retries transient failures and
//! falls back to deterministic sample data, so the dashboard always has
//! something to render.

pub mod config;
pub mod error;
pub mod facade;
pub mod retry;
pub mod sources;
pub mod transport;

pub use config::{FeedConfig, MarketCredentials, SourceCredentials};
pub use error::FetchError;
pub use facade::{FeedFacade, FetchResult};
pub use retry::RetryPolicy;
pub use sources::{FetchQuery, FetchRequest, Payload, SourceKind};
pub use transport::{HttpTransport, Transport, TransportReply, TransportRequest};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("coopfeed=debug".parse().unwrap()))
        .init();
}
