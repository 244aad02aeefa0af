//! Concurrent HTTP probing.
//!
//! This module fetches targets, converts every per-target failure into a
//! result record, and bounds how many fetches are in flight at once.
//!
//! # Features
//!
//! - Semaphore-bounded concurrency with one shared connection pool per run
//! - Content fingerprints, `Content-Type`, and body length for every response
//! - Optional title, favicon hash, and CDN/WAF detection
//! - Per-request timeouts that fail only the affected target

mod client;
pub mod config;
pub mod constants;
mod engine;
mod error;
mod result;
mod title;

pub use client::ProbeClient;
pub use config::{HeaderError, ProbeConfig, ProbeToggles, parse_header_line, parse_header_lines};
pub use engine::{DEFAULT_CONCURRENCY, EngineError, MAX_CONCURRENCY, ProbeEngine, ProbeSummary};
pub use error::ProbeError;
pub use result::{ProbeOutcome, ProbeResult, ResponseSummary};
pub use title::extract_title;
