//! HTTP client wrapper for probing a single target.
//!
//! This module provides the `ProbeClient` struct which performs the primary
//! GET, derives fingerprints and heuristics from the response, and runs the
//! optional favicon probe. Failures are converted into result data here.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap};
use reqwest::{Client, redirect};
use tracing::{debug, instrument};
use url::Url;

use super::config::{ProbeConfig, ProbeToggles};
use super::constants::{CONNECT_TIMEOUT_SECS, FAVICON_PATH, MAX_REDIRECTS};
use super::error::ProbeError;
use super::result::{ProbeResult, ResponseSummary};
use super::title::extract_title;
use crate::fingerprint::{self, HashAlgorithm};
use crate::heuristics::{detect_cdn, detect_waf};

/// HTTP client for probing targets.
///
/// This client is designed to be created once per run and cloned into each
/// probe task; clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use httprobe_core::probe::{ProbeClient, ProbeConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ProbeClient::new(&ProbeConfig::default())?;
/// let result = client.fetch("https://example.com").await;
/// println!("{:?}", result.status_code());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ProbeClient {
    client: Client,
    content_hash: HashAlgorithm,
    toggles: ProbeToggles,
}

impl ProbeClient {
    /// Builds a client from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`reqwest::Error`] if the HTTP client cannot be
    /// built (for example when the TLS backend fails to initialize).
    #[instrument(level = "debug", skip(config), fields(timeout_ms = config.timeout.as_millis()))]
    pub fn new(config: &ProbeConfig) -> Result<Self, reqwest::Error> {
        let redirect_policy = if config.follow_redirects {
            redirect::Policy::limited(MAX_REDIRECTS)
        } else {
            redirect::Policy::none()
        };

        let client = Client::builder()
            .connect_timeout(config.timeout.min(Duration::from_secs(CONNECT_TIMEOUT_SECS)))
            .timeout(config.timeout)
            .gzip(true)
            .redirect(redirect_policy)
            .user_agent(config.user_agent.as_str())
            .default_headers(config.headers.clone())
            .build()?;

        debug!(
            follow_redirects = config.follow_redirects,
            content_hash = %config.content_hash,
            custom_headers = config.headers.len(),
            "built probe client"
        );

        Ok(Self {
            client,
            content_hash: config.content_hash,
            toggles: config.toggles,
        })
    }

    /// Probes one target.
    ///
    /// Never fails: any error during the primary fetch becomes a result with
    /// only `url` and `error` set.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str) -> ProbeResult {
        match self.fetch_primary(url).await {
            Ok(summary) => {
                debug!(
                    status = summary.status_code,
                    bytes = summary.content_length,
                    "probe responded"
                );
                ProbeResult::responded(url, summary)
            }
            Err(error) => {
                debug!(error = %error, "probe failed");
                ProbeResult::failed(url, error.to_string())
            }
        }
    }

    async fn fetch_primary(&self, url: &str) -> Result<ResponseSummary, ProbeError> {
        let target = parse_target(url)?;

        let response = self
            .client
            .get(target.clone())
            .send()
            .await
            .map_err(|e| ProbeError::from_request(url, e))?;

        let status_code = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProbeError::from_body(url, e))?;

        let mut summary = ResponseSummary::new(
            status_code,
            u64::try_from(body.len()).unwrap_or(u64::MAX),
            content_type(&headers),
            fingerprint::hash(&body, self.content_hash).to_hex(),
        );

        if self.toggles.title {
            summary.title = Some(extract_title(&String::from_utf8_lossy(&body)));
        }
        if self.toggles.cdn {
            summary.cdn_detected = Some(detect_cdn(&headers));
        }
        if self.toggles.waf {
            summary.waf_detected = Some(detect_waf(&headers));
        }
        if self.toggles.favicon {
            summary.favicon_hash = self.fetch_favicon(&target).await;
        }

        Ok(summary)
    }

    /// Fetches `/favicon.ico` on the target's origin and returns its fast hash.
    ///
    /// Every failure is absorbed; the caller just omits the field.
    async fn fetch_favicon(&self, target: &Url) -> Option<u32> {
        let favicon_url = target.join(FAVICON_PATH).ok()?;

        let response = match self.client.get(favicon_url.clone()).send().await {
            Ok(response) => response,
            Err(error) => {
                debug!(url = %favicon_url, error = %error, "favicon request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(url = %favicon_url, status = response.status().as_u16(), "no favicon");
            return None;
        }

        match response.bytes().await {
            Ok(body) if !body.is_empty() => Some(fingerprint::fast_hash(&body)),
            Ok(_) => {
                debug!(url = %favicon_url, "empty favicon body");
                None
            }
            Err(error) => {
                debug!(url = %favicon_url, error = %error, "favicon body read failed");
                None
            }
        }
    }
}

fn parse_target(url: &str) -> Result<Url, ProbeError> {
    Url::parse(url)
        .ok()
        .filter(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .ok_or_else(|| ProbeError::invalid_url(url))
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .unwrap_or_default()
}
