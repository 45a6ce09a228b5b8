//! Error taxonomy for the fetch facade
//!
//! Every variant is absorbed inside the facade; callers only ever observe
//! a [`FetchResult`](crate::facade::FetchResult). The variants exist so the
//! retry loop and the fallback reason can distinguish failure modes.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("no usable credentials configured")]
    NoCredentials,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("remote returned HTTP {status}")]
    RemoteStatus { status: u16 },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("response contained no records")]
    Empty,
    #[error("fetch budget exhausted")]
    DeadlineExceeded,
}

impl FetchError {
    /// Whether another attempt could plausibly produce a different outcome.
    ///
    /// Auth rejections (401/403) are excluded: the key will be just as bad
    /// on the next attempt. An empty result is a final, well-formed answer,
    /// so it is not worth repeating either.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport(_) | FetchError::Malformed(_) => true,
            FetchError::RemoteStatus { status } => !matches!(status, 401 | 403),
            FetchError::NoCredentials | FetchError::Empty | FetchError::DeadlineExceeded => false,
        }
    }
}
