//! CLI entry point for the httprobe tool.

use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Read};
use std::time::Duration;

use anyhow::{Context, Result};
use httprobe_core::{
    DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS, Field, HashAlgorithm, OutputOptions, PredicateSet,
    ProbeConfig, ProbeEngine, ProbeSummary, ProbeToggles, RuleGroup, TargetSources,
    collect_targets, parse_header_lines, write_surfaced,
};
use tracing::{debug, info};

mod app_config;
mod cli;

use app_config::FileConfig;
use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse_normalized();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries only result lines.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let loaded = app_config::load_config(args.config.as_deref())?;
    if let Some(path) = &loaded.path {
        debug!(path = %path.display(), "loaded config file");
    }
    let file_config = loaded.config;

    // Fall back to piped stdin only when no target flag was given
    let stdin = if args.urls.is_empty()
        && args.target.is_none()
        && args.list.is_none()
        && !io::stdin().is_terminal()
    {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read targets from stdin")?;
        Some(buffer)
    } else {
        None
    };

    let targets = collect_targets(&TargetSources {
        urls: args.urls.clone(),
        target: args.target.clone(),
        list: args.list.clone(),
        stdin,
    })?;

    let concurrency = args
        .concurrency
        .map(usize::from)
        .or(file_config.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY);
    let config = build_probe_config(&args, &file_config)?;
    let predicates = build_predicates(&args)?;

    info!(
        targets = targets.len(),
        concurrency,
        timeout_secs = config.timeout.as_secs(),
        "probing targets"
    );

    let engine = ProbeEngine::new(concurrency, config)?;
    let results = engine.run(&targets).await?;

    let options = OutputOptions {
        status_code: args.status_code,
        content_length: args.content_length,
    };

    let mut stdout = BufWriter::new(io::stdout().lock());
    let surfaced = write_surfaced(&mut stdout, &results, &predicates, options)
        .context("Failed to write results to stdout")?;

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
        write_surfaced(&mut BufWriter::new(file), &results, &predicates, options)
            .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
    }

    let summary = ProbeSummary::from_results(&results);
    info!(
        responded = summary.responded,
        failed = summary.failed,
        surfaced,
        "probe complete"
    );

    Ok(())
}

/// Merges CLI flags over file defaults into the run configuration.
fn build_probe_config(args: &Args, file_config: &FileConfig) -> Result<ProbeConfig> {
    let content_hash = match args.hash.as_deref() {
        Some(name) => name
            .parse::<HashAlgorithm>()
            .context("Invalid --hash value")?,
        None => file_config.hash.unwrap_or_default(),
    };

    let headers = parse_header_lines(&args.headers).context("Invalid --header value")?;

    let timeout_secs = args
        .timeout
        .or(file_config.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let mut config = ProbeConfig::default()
        .with_timeout(Duration::from_secs(timeout_secs))
        .with_headers(headers)
        .with_content_hash(content_hash)
        .with_toggles(ProbeToggles {
            title: args.title,
            favicon: args.favicon,
            cdn: args.cdn,
            waf: args.waf,
        });
    config.follow_redirects = args.follow_redirects || file_config.follow_redirects.unwrap_or(false);
    if let Some(user_agent) = args.user_agent.clone().or_else(|| file_config.user_agent.clone()) {
        config.user_agent = user_agent;
    }
    Ok(config)
}

/// Builds matchers and filters from the match/filter flags.
fn build_predicates(args: &Args) -> Result<PredicateSet> {
    let mut matchers = RuleGroup::new()
        .with(Field::StatusCode, args.match_code.iter().copied())
        .with(Field::ContentLength, args.match_length.iter().copied());
    for rule in &args.match_fields {
        matchers
            .insert_rule(rule)
            .with_context(|| format!("Invalid --match-field '{rule}'"))?;
    }

    let mut filters = RuleGroup::new()
        .with(Field::StatusCode, args.filter_code.iter().copied())
        .with(Field::ContentLength, args.filter_length.iter().copied());
    for rule in &args.filter_fields {
        filters
            .insert_rule(rule)
            .with_context(|| format!("Invalid --filter-field '{rule}'"))?;
    }

    Ok(PredicateSet::new(matchers, filters))
}
