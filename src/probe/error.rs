//! Error types for a single probe.
//!
//! A `ProbeError` never escapes [`ProbeClient::fetch`](super::ProbeClient::fetch);
//! it is rendered into the result's `error` field instead.

use thiserror::Error;

/// Failures during the primary fetch of a target.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error probing {url}: {source}")]
    Network {
        /// The target that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before the response was fully read.
    #[error("timeout probing {url}")]
    Timeout {
        /// The target that timed out.
        url: String,
    },

    /// Response headers arrived but the body could not be read.
    #[error("failed reading response body from {url}: {source}")]
    Body {
        /// The target whose body failed.
        url: String,
        /// The underlying read error.
        #[source]
        source: reqwest::Error,
    },

    /// The target is not an absolute http(s) URL.
    #[error("invalid URL: {url:?}")]
    InvalidUrl {
        /// The invalid target string.
        url: String,
    },
}

impl ProbeError {
    /// Classifies a request error, promoting timeouts to [`ProbeError::Timeout`].
    pub fn from_request(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Classifies a body read error, promoting timeouts to [`ProbeError::Timeout`].
    pub fn from_body(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Body {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}
