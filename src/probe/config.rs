//! Explicit per-run probe configuration.
//!
//! Every knob the fetcher consults lives here and is passed in by value;
//! nothing is read from ambient state.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

use super::constants::DEFAULT_TIMEOUT_SECS;
use crate::fingerprint::HashAlgorithm;
use crate::user_agent;

/// Errors raised while building request headers from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    /// Header line without a `:` separator.
    #[error("invalid header {raw:?}: expected \"Name: value\"")]
    MissingSeparator {
        /// The raw header line.
        raw: String,
    },

    /// Header name is not a valid HTTP token.
    #[error("invalid header name {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// Header value contains forbidden bytes.
    #[error("invalid value for header {name:?}")]
    InvalidValue {
        /// The header whose value was rejected.
        name: String,
    },
}

/// Optional secondary probes, each off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeToggles {
    /// Extract the HTML `<title>`.
    pub title: bool,
    /// Fetch and hash `/favicon.ico`.
    pub favicon: bool,
    /// Run CDN header detection.
    pub cdn: bool,
    /// Run WAF header detection.
    pub waf: bool,
}

/// Configuration shared by every fetch in a run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Per-request timeout covering connect, headers, and body.
    pub timeout: Duration,
    /// Extra headers sent with every request.
    pub headers: HeaderMap,
    /// User-Agent sent unless `headers` overrides it.
    pub user_agent: String,
    /// Follow redirects instead of reporting 3xx responses.
    pub follow_redirects: bool,
    /// Fingerprint algorithm for response bodies.
    pub content_hash: HashAlgorithm,
    /// Which secondary probes to run.
    pub toggles: ProbeToggles,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            headers: HeaderMap::new(),
            user_agent: user_agent::default_probe_user_agent(),
            follow_redirects: false,
            content_hash: HashAlgorithm::default(),
            toggles: ProbeToggles::default(),
        }
    }
}

impl ProbeConfig {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_toggles(mut self, toggles: ProbeToggles) -> Self {
        self.toggles = toggles;
        self
    }

    #[must_use]
    pub fn with_content_hash(mut self, algorithm: HashAlgorithm) -> Self {
        self.content_hash = algorithm;
        self
    }
}

/// Parses a `Name: value` header line.
///
/// # Errors
///
/// Returns a [`HeaderError`] if the separator is missing or the name or
/// value are not valid HTTP header text.
pub fn parse_header_line(raw: &str) -> Result<(HeaderName, HeaderValue), HeaderError> {
    let Some((name, value)) = raw.split_once(':') else {
        return Err(HeaderError::MissingSeparator {
            raw: raw.to_string(),
        });
    };
    let name = name.trim();
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| HeaderError::InvalidName {
            name: name.to_string(),
        })?;
    let header_value =
        HeaderValue::from_str(value.trim()).map_err(|_| HeaderError::InvalidValue {
            name: name.to_string(),
        })?;
    Ok((header_name, header_value))
}

/// Builds a header map from `Name: value` lines; repeated names are kept.
///
/// # Errors
///
/// Returns the first [`HeaderError`] encountered.
pub fn parse_header_lines<I, S>(lines: I) -> Result<HeaderMap, HeaderError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut headers = HeaderMap::new();
    for line in lines {
        let (name, value) = parse_header_line(line.as_ref())?;
        headers.append(name, value);
    }
    Ok(headers)
}
