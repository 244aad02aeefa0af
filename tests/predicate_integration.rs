//! Integration tests for match/filter selection over probed results.

use std::time::Duration;

use httprobe_core::{
    Field, OutputOptions, PredicateSet, ProbeConfig, ProbeEngine, ProbeResult, ProbeToggles,
    RuleGroup, write_surfaced,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

const UNREACHABLE: &str = "http://127.0.0.1:1/";

async fn probe_fixture(mock_server: &MockServer) -> Vec<ProbeResult> {
    Mock::given(method("GET"))
        .and(path("/home"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("server", "cloudflare")
                .set_body_string("<title>Home</title>"),
        )
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200))
        .mount(mock_server)
        .await;

    let urls = vec![
        format!("{}/home", mock_server.uri()),
        format!("{}/admin", mock_server.uri()),
        format!("{}/empty", mock_server.uri()),
        UNREACHABLE.to_string(),
    ];
    let config = ProbeConfig::default()
        .with_timeout(Duration::from_secs(5))
        .with_toggles(ProbeToggles {
            title: true,
            cdn: true,
            ..ProbeToggles::default()
        });

    ProbeEngine::new(4, config).unwrap().run(&urls).await.unwrap()
}

fn surfaced_paths(results: &[ProbeResult], predicates: &PredicateSet) -> Vec<String> {
    results
        .iter()
        .filter(|result| predicates.accepts(result))
        .map(|result| {
            result
                .url
                .rsplit('/')
                .next()
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

#[tokio::test]
async fn test_no_rules_surface_everything() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let results = probe_fixture(&mock_server).await;

    let predicates = PredicateSet::default();
    assert!(predicates.is_empty());
    assert_eq!(surfaced_paths(&results, &predicates), vec!["home", "admin", "empty", ""]);
}

#[tokio::test]
async fn test_status_matcher_excludes_failures() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let results = probe_fixture(&mock_server).await;

    let predicates = PredicateSet::new(
        RuleGroup::new().with(Field::StatusCode, [200u16, 403]),
        RuleGroup::new(),
    );
    assert_eq!(surfaced_paths(&results, &predicates), vec!["home", "admin", "empty"]);
}

#[tokio::test]
async fn test_length_filter_drops_empty_bodies() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let results = probe_fixture(&mock_server).await;

    let predicates = PredicateSet::new(
        RuleGroup::new(),
        RuleGroup::new().with(Field::ContentLength, [0u64]),
    );
    assert_eq!(surfaced_paths(&results, &predicates), vec!["home", "admin", ""]);
}

#[tokio::test]
async fn test_matcher_and_filter_combine() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let results = probe_fixture(&mock_server).await;

    let mut matchers = RuleGroup::new();
    matchers.insert_rule("status_code=200").unwrap();
    let mut filters = RuleGroup::new();
    filters.insert_rule("title=N/A").unwrap();

    let predicates = PredicateSet::new(matchers, filters);
    assert_eq!(surfaced_paths(&results, &predicates), vec!["home"]);
}

#[tokio::test]
async fn test_cdn_field_rule() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let results = probe_fixture(&mock_server).await;

    let mut matchers = RuleGroup::new();
    matchers.insert_rule("cdn_detected=true").unwrap();

    let predicates = PredicateSet::new(matchers, RuleGroup::new());
    assert_eq!(surfaced_paths(&results, &predicates), vec!["home"]);
}

#[tokio::test]
async fn test_write_surfaced_counts_lines() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let results = probe_fixture(&mock_server).await;

    let predicates = PredicateSet::new(
        RuleGroup::new(),
        RuleGroup::new().with(Field::StatusCode, [403u16]),
    );
    let mut buffer = Vec::new();
    let written =
        write_surfaced(&mut buffer, &results, &predicates, OutputOptions::default()).unwrap();

    assert_eq!(written, 3);
    assert_eq!(String::from_utf8(buffer).unwrap().lines().count(), 3);
}
