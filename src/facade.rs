//! The resilient fetch facade
//!
//! Single entry point for every dashboard widget: `fetch` always comes
//! back with a display-ready payload, live when the remote source
//! cooperates and deterministic sample data otherwise. Nothing that goes
//! wrong underneath ever reaches the caller as an error.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::FeedConfig;
use crate::error::FetchError;
use crate::retry::{with_retry, RetryPolicy};
use crate::sources::{self, FetchRequest, Payload};
use crate::transport::Transport;

/// Outcome of one facade invocation, provenance always attached
#[derive(Debug, Clone)]
pub enum FetchResult {
    Live {
        payload: Payload,
        fetched_at: DateTime<Utc>,
        attempts: u32,
    },
    Fallback {
        payload: Payload,
        reason: FetchError,
        attempts: u32,
    },
}

impl FetchResult {
    pub fn payload(&self) -> &Payload {
        match self {
            FetchResult::Live { payload, .. } => payload,
            FetchResult::Fallback { payload, .. } => payload,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, FetchResult::Live { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            FetchResult::Live { attempts, .. } => *attempts,
            FetchResult::Fallback { attempts, .. } => *attempts,
        }
    }
}

pub struct FeedFacade {
    config: FeedConfig,
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl FeedFacade {
    pub fn new(config: FeedConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch live data for `request`, falling back to sample data rather
    /// than ever failing. Unconfigured sources skip the network entirely.
    pub async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        if let Err(reason) = sources::check_credentials(request, &self.config) {
            tracing::info!(source = ?request.kind(), "serving sample data: {}", reason);
            return FetchResult::Fallback {
                payload: sources::synthetic_payload(request),
                reason,
                attempts: 0,
            };
        }

        let (outcome, attempts) = with_retry(self.policy, || self.attempt(request)).await;

        match outcome {
            Ok(payload) => {
                tracing::info!(source = ?request.kind(), attempts, "serving live data");
                FetchResult::Live {
                    payload,
                    fetched_at: Utc::now(),
                    attempts,
                }
            }
            Err(reason) => {
                tracing::warn!(
                    source = ?request.kind(),
                    attempts,
                    "serving sample data: {}",
                    reason
                );
                FetchResult::Fallback {
                    payload: sources::synthetic_payload(request),
                    reason,
                    attempts,
                }
            }
        }
    }

    /// Like [`fetch`](Self::fetch), but bounded by a page-load budget.
    /// Remaining attempts are abandoned when the budget expires.
    pub async fn fetch_within(&self, request: &FetchRequest, budget: Duration) -> FetchResult {
        match tokio::time::timeout(budget, self.fetch(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(source = ?request.kind(), "fetch budget expired, serving sample data");
                FetchResult::Fallback {
                    payload: sources::synthetic_payload(request),
                    reason: FetchError::DeadlineExceeded,
                    attempts: 0,
                }
            }
        }
    }

    async fn attempt(&self, request: &FetchRequest) -> Result<Payload, FetchError> {
        let transport_request = sources::build_request(request, &self.config)?;
        let reply = self.transport.get(&transport_request).await?;

        if !reply.is_success() {
            return Err(FetchError::RemoteStatus {
                status: reply.status,
            });
        }

        sources::parse_payload(request, &reply.body)
    }
}
