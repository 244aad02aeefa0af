//! Probe result records.
//!
//! A result is either a response (status code always present, derived fields
//! optional) or a failure carrying only the error text. The two shapes are
//! separate variants, so a failure can never carry derived fields.

use serde::Serialize;

/// Everything derived from a successful primary fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseSummary {
    /// HTTP status code of the primary response.
    pub status_code: u16,
    /// Body length in bytes.
    pub content_length: u64,
    /// `Content-Type` header value, empty when absent.
    pub content_type: String,
    /// Body fingerprint rendered as text.
    pub content_hash: String,
    /// Document title, `"N/A"` when none exists. Only set when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Fast hash of `/favicon.ico`. Only set when requested and fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon_hash: Option<u32>,
    /// CDN heuristic outcome. Only set when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cdn_detected: Option<bool>,
    /// WAF heuristic outcome. Only set when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waf_detected: Option<bool>,
}

impl ResponseSummary {
    /// Creates a summary with only the always-present fields.
    #[must_use]
    pub fn new(
        status_code: u16,
        content_length: u64,
        content_type: impl Into<String>,
        content_hash: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            content_length,
            content_type: content_type.into(),
            content_hash: content_hash.into(),
            title: None,
            favicon_hash: None,
            cdn_detected: None,
            waf_detected: None,
        }
    }
}

/// Outcome of probing one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProbeOutcome {
    /// The primary fetch produced a response.
    Response(ResponseSummary),
    /// The primary fetch failed.
    Failed {
        /// Description of the underlying failure.
        error: String,
    },
}

/// One record per probed target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    /// The target exactly as supplied.
    pub url: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    /// Creates a result for a target that responded.
    #[must_use]
    pub fn responded(url: impl Into<String>, summary: ResponseSummary) -> Self {
        Self {
            url: url.into(),
            outcome: ProbeOutcome::Response(summary),
        }
    }

    /// Creates a result for a target that failed.
    #[must_use]
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outcome: ProbeOutcome::Failed {
                error: error.into(),
            },
        }
    }

    /// Returns the response summary, if the fetch succeeded.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseSummary> {
        match &self.outcome {
            ProbeOutcome::Response(summary) => Some(summary),
            ProbeOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ProbeOutcome::Failed { error } => Some(error),
            ProbeOutcome::Response(_) => None,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Failed { .. })
    }

    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.response().map(|r| r.status_code)
    }

    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.response().map(|r| r.content_length)
    }

    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.response().map(|r| r.content_type.as_str())
    }

    #[must_use]
    pub fn content_hash(&self) -> Option<&str> {
        self.response().map(|r| r.content_hash.as_str())
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.response().and_then(|r| r.title.as_deref())
    }

    #[must_use]
    pub fn favicon_hash(&self) -> Option<u32> {
        self.response().and_then(|r| r.favicon_hash)
    }

    #[must_use]
    pub fn cdn_detected(&self) -> Option<bool> {
        self.response().and_then(|r| r.cdn_detected)
    }

    #[must_use]
    pub fn waf_detected(&self) -> Option<bool> {
        self.response().and_then(|r| r.waf_detected)
    }
}
