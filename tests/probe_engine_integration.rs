//! Integration tests for the probe engine.
//!
//! These tests run `ProbeEngine` against a mock HTTP server and check result
//! correlation, failure records, and the concurrency bound.

use std::time::{Duration, Instant};

use httprobe_core::{
    HashAlgorithm, ProbeConfig, ProbeEngine, ProbeOutcome, ProbeSummary, ProbeToggles,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

macro_rules! require_mock_server {
    () => {{
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        mock_server
    }};
}

/// Nothing listens on port 1, so connects are refused immediately.
const UNREACHABLE: &str = "http://127.0.0.1:1/";

const SLOW_DELAY: Duration = Duration::from_millis(400);

fn test_config() -> ProbeConfig {
    ProbeConfig::default().with_timeout(Duration::from_secs(5))
}

async fn mount_slow(mock_server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(SLOW_DELAY),
        )
        .mount(mock_server)
        .await;
}

// ==================== Correlation ====================

#[tokio::test]
async fn test_engine_one_result_per_input_in_order() {
    let mock_server = require_mock_server!();

    // First target is the slowest so completion order differs from input order
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let urls = vec![
        format!("{}/slow", mock_server.uri()),
        format!("{}/fast", mock_server.uri()),
        UNREACHABLE.to_string(),
        format!("{}/gone", mock_server.uri()),
    ];

    let engine = ProbeEngine::new(4, test_config()).unwrap();
    let results = engine.run(&urls).await.unwrap();

    assert_eq!(results.len(), urls.len());
    for (url, result) in urls.iter().zip(&results) {
        assert_eq!(&result.url, url);
    }
    assert_eq!(results[0].status_code(), Some(200));
    assert_eq!(results[1].status_code(), Some(204));
    assert!(results[2].is_failure());
    assert_eq!(results[3].status_code(), Some(410));
}

#[tokio::test]
async fn test_engine_duplicate_targets_probed_independently() {
    let mock_server = require_mock_server!();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("same"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    let urls = vec![url.clone(), url.clone(), url];

    let engine = ProbeEngine::new(2, test_config()).unwrap();
    let results = engine.run(&urls).await.unwrap();

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|result| result.status_code() == Some(200)));
    assert!(
        results
            .windows(2)
            .all(|pair| pair[0].content_hash() == pair[1].content_hash())
    );
}

#[tokio::test]
async fn test_engine_empty_input_returns_empty() {
    let engine = ProbeEngine::new(3, test_config()).unwrap();
    let results = engine.run(&[]).await.unwrap();
    assert!(results.is_empty());
}

// ==================== Failure records ====================

#[tokio::test]
async fn test_engine_failure_records_carry_only_error() {
    let urls = vec![
        UNREACHABLE.to_string(),
        "not a url".to_string(),
        "ftp://files.test/readme".to_string(),
    ];

    let config = test_config().with_toggles(ProbeToggles {
        title: true,
        favicon: true,
        cdn: true,
        waf: true,
    });
    let engine = ProbeEngine::new(3, config).unwrap();
    let results = engine.run(&urls).await.unwrap();

    assert_eq!(results.len(), 3);
    for result in &results {
        assert!(result.is_failure(), "{} should have failed", result.url);
        assert!(!result.error().unwrap_or_default().is_empty());
        assert!(matches!(result.outcome, ProbeOutcome::Failed { .. }));
        assert_eq!(result.status_code(), None);
        assert_eq!(result.content_hash(), None);
        assert_eq!(result.title(), None);
        assert_eq!(result.favicon_hash(), None);
        assert_eq!(result.cdn_detected(), None);
        assert_eq!(result.waf_detected(), None);

        let json = serde_json::to_value(result).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"url") && keys.contains(&"error"));
    }
}

#[tokio::test]
async fn test_engine_timeout_becomes_failure() {
    let mock_server = require_mock_server!();

    Mock::given(method("GET"))
        .and(path("/hang"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let config = ProbeConfig::default().with_timeout(Duration::from_millis(200));
    let engine = ProbeEngine::new(1, config).unwrap();
    let results = engine
        .run(&[format!("{}/hang", mock_server.uri())])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].is_failure());
}

// ==================== Mixed run ====================

#[tokio::test]
async fn test_engine_mixed_run_with_unreachable_target() {
    let mock_server = require_mock_server!();
    mount_slow(&mock_server, "/a", "alpha").await;
    mount_slow(&mock_server, "/b", "bravo").await;

    let urls = vec![
        format!("{}/a", mock_server.uri()),
        UNREACHABLE.to_string(),
        format!("{}/b", mock_server.uri()),
    ];

    let config = test_config().with_content_hash(HashAlgorithm::Sha256);
    let engine = ProbeEngine::new(2, config).unwrap();

    let started = Instant::now();
    let results = engine.run(&urls).await.unwrap();
    let elapsed = started.elapsed();

    let summary = ProbeSummary::from_results(&results);
    assert_eq!(summary.responded, 2);
    assert_eq!(summary.failed, 1);

    assert_eq!(results[0].content_length(), Some(5));
    assert_eq!(results[0].content_hash().map(str::len), Some(64));
    assert!(results[1].error().is_some());
    assert_eq!(results[2].content_length(), Some(5));
    assert_ne!(results[0].content_hash(), results[2].content_hash());

    // The refused connect frees its slot at once, so both slow fetches overlap
    assert!(
        elapsed < SLOW_DELAY * 3,
        "mixed run took {elapsed:?}, expected overlap of slow fetches"
    );
}

// ==================== Concurrency bound ====================

#[tokio::test]
async fn test_engine_concurrency_limit_serializes_excess() {
    let mock_server = require_mock_server!();
    for route in ["/1", "/2", "/3"] {
        mount_slow(&mock_server, route, "x").await;
    }

    let urls: Vec<String> = ["/1", "/2", "/3"]
        .iter()
        .map(|route| format!("{}{route}", mock_server.uri()))
        .collect();

    let engine = ProbeEngine::new(2, test_config()).unwrap();
    let started = Instant::now();
    let results = engine.run(&urls).await.unwrap();
    let elapsed = started.elapsed();

    assert!(results.iter().all(|result| result.status_code() == Some(200)));
    // Two slots for three slow fetches needs at least two rounds
    assert!(
        elapsed >= SLOW_DELAY * 2,
        "run took {elapsed:?}, expected at least {:?}",
        SLOW_DELAY * 2
    );
}

#[tokio::test]
async fn test_engine_full_concurrency_runs_in_one_round() {
    let mock_server = require_mock_server!();
    for route in ["/1", "/2", "/3"] {
        mount_slow(&mock_server, route, "x").await;
    }

    let urls: Vec<String> = ["/1", "/2", "/3"]
        .iter()
        .map(|route| format!("{}{route}", mock_server.uri()))
        .collect();

    let engine = ProbeEngine::new(3, test_config()).unwrap();
    let started = Instant::now();
    let results = engine.run(&urls).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(results.len(), 3);
    assert!(elapsed >= SLOW_DELAY);
    assert!(
        elapsed < SLOW_DELAY * 3,
        "run took {elapsed:?}, expected parallel fetches"
    );
}
