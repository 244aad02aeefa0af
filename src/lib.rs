//! httprobe Core Library
//!
//! This library provides the core functionality for the httprobe tool,
//! which fetches a list of web targets concurrently, fingerprints each
//! response, and selects which results to report.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fingerprint`] - Content digests (MD5/SHA-1/SHA-256) and the fast favicon hash
//! - [`heuristics`] - Header-based CDN and WAF detection
//! - [`probe`] - Single-target fetcher and the bounded-concurrency engine
//! - [`predicate`] - Match/filter rules over probe results
//! - [`targets`] - Target list assembly from arguments, files, and stdin
//! - [`output`] - JSON-lines rendering of surfaced results

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod fingerprint;
pub mod heuristics;
pub mod output;
pub mod predicate;
pub mod probe;
pub mod targets;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use fingerprint::{FingerprintError, HashAlgorithm, HashValue, fast_hash, hash};
pub use heuristics::{detect_cdn, detect_waf};
pub use output::{OutputOptions, render_line, write_surfaced};
pub use predicate::{
    Field, FieldValue, PredicateError, PredicateSet, RuleGroup, matches, passes_filter,
};
pub use probe::constants::{DEFAULT_TIMEOUT_SECS, MAX_TIMEOUT_SECS};
pub use probe::{
    DEFAULT_CONCURRENCY, EngineError, HeaderError, MAX_CONCURRENCY, ProbeClient, ProbeConfig,
    ProbeEngine, ProbeError, ProbeOutcome, ProbeResult, ProbeSummary, ProbeToggles,
    ResponseSummary, parse_header_lines,
};
pub use targets::{TargetError, TargetSources, collect_targets};
