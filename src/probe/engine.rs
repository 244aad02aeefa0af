//! Probe engine for concurrent target probing.
//!
//! This module provides the `ProbeEngine` which coordinates concurrent
//! probes using a semaphore-based concurrency control pattern.
//!
//! # Overview
//!
//! The engine builds one [`ProbeClient`] per run, spawns one task per target,
//! and returns exactly one [`ProbeResult`] per input URL, in input order.
//!
//! # Example
//!
//! ```no_run
//! use httprobe_core::probe::{ProbeConfig, ProbeEngine};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ProbeEngine::new(10, ProbeConfig::default())?;
//! let targets = vec!["https://example.com".to_string()];
//! let results = engine.run(&targets).await?;
//! assert_eq!(results.len(), targets.len());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::client::ProbeClient;
use super::config::ProbeConfig;
use super::result::ProbeResult;

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 500;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Error type for probe engine operations.
///
/// Only run-level problems land here; per-target failures are results.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The shared HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The permit semaphore was closed.
    ///
    /// `acquire_owned` only fails on a closed semaphore and the engine never
    /// closes its own, so this is returned instead of panicking on that path.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

/// Counts from a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSummary {
    /// Targets that produced a response (any status).
    pub responded: usize,
    /// Targets whose primary fetch failed.
    pub failed: usize,
}

impl ProbeSummary {
    /// Tallies a result set.
    #[must_use]
    pub fn from_results(results: &[ProbeResult]) -> Self {
        let failed = results.iter().filter(|r| r.is_failure()).count();
        Self {
            responded: results.len() - failed,
            failed,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.responded + self.failed
    }
}

/// Probe engine for concurrent, failure-isolated target probing.
///
/// # Concurrency Model
///
/// - Each probe runs in its own Tokio task
/// - A semaphore permit is acquired before spawning each probe
/// - Permits are released automatically when probes complete (RAII)
/// - All tasks share one HTTP client (connection pool) for the run
///
/// # Failure Isolation
///
/// - A failed fetch becomes a result, never an error of the run
/// - A panicking task becomes a failed result for its own URL
#[derive(Debug)]
pub struct ProbeEngine {
    /// Semaphore for concurrency control.
    semaphore: Arc<Semaphore>,
    /// Configured concurrency limit.
    concurrency: usize,
    /// Per-fetch configuration.
    config: ProbeConfig,
}

impl ProbeEngine {
    /// Creates a new probe engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if `concurrency` is outside
    /// the valid range (1-500).
    #[instrument(level = "debug", skip(config))]
    pub fn new(concurrency: usize, config: ProbeConfig) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }

        debug!(
            concurrency,
            timeout_ms = config.timeout.as_millis(),
            toggles = ?config.toggles,
            "creating probe engine"
        );

        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            config,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Probes every target and returns one result per input URL, in input order.
    ///
    /// The HTTP client is created for this run and dropped when it returns.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Client`] if the HTTP client cannot be built.
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    ///
    /// Note: Individual probe failures do NOT cause this method to error.
    #[instrument(skip(self, urls), fields(targets = urls.len(), concurrency = self.concurrency))]
    pub async fn run(&self, urls: &[String]) -> Result<Vec<ProbeResult>, EngineError> {
        let client = ProbeClient::new(&self.config).map_err(EngineError::Client)?;
        self.run_with_client(urls, &client).await
    }

    /// Like [`run`](Self::run), but with a caller-provided client.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    pub async fn run_with_client(
        &self,
        urls: &[String],
        client: &ProbeClient,
    ) -> Result<Vec<ProbeResult>, EngineError> {
        let mut handles = Vec::with_capacity(urls.len());

        info!(targets = urls.len(), "starting probe run");

        for url in urls {
            // Acquire semaphore permit (waits if at concurrency limit)
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let client = client.clone();
            let task_url = url.clone();

            handles.push(tokio::spawn(async move {
                // Permit is dropped when this block exits (RAII)
                let _permit = permit;
                client.fetch(&task_url).await
            }));
        }

        debug!(task_count = handles.len(), "waiting for probes to complete");

        // Handles are in input order; awaiting them in order keeps the
        // url-to-result correlation without blocking the other tasks.
        let mut results = Vec::with_capacity(urls.len());
        for (url, handle) in urls.iter().zip(handles) {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(url = %url, error = %e, "probe task panicked");
                    results.push(ProbeResult::failed(url, format!("probe task failed: {e}")));
                }
            }
        }

        let summary = ProbeSummary::from_results(&results);
        info!(
            responded = summary.responded,
            failed = summary.failed,
            total = summary.total(),
            "probe run complete"
        );

        Ok(results)
    }
}
