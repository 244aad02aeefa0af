//! CLI argument definitions using clap derive macros.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// Single-dash multi-letter flags kept for compatibility, and their long forms.
const LEGACY_FLAGS: &[(&str, &str)] = &[
    ("-mc", "--match-code"),
    ("-fc", "--filter-code"),
    ("-ml", "--match-length"),
    ("-fl", "--filter-length"),
    ("-sc", "--status-code"),
    ("-cl", "--content-length"),
];

/// Probe HTTP targets concurrently and report fingerprints.
///
/// Each target is fetched once; results are filtered by the match/filter
/// rules and printed as one JSON object per line.
#[derive(Parser, Debug)]
#[command(name = "httprobe")]
#[command(author, version, about)]
pub struct Args {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Target URLs
    #[arg(short = 'u', long = "urls", num_args = 1..)]
    pub urls: Vec<String>,

    /// Single target URL
    #[arg(short = 't', long)]
    pub target: Option<String>,

    /// File with one target URL per line
    #[arg(short = 'l', long)]
    pub list: Option<PathBuf>,

    /// Maximum concurrent probes (1-500, default 10)
    #[arg(short = 'c', long, value_parser = clap::value_parser!(u16).range(1..=500))]
    pub concurrency: Option<u16>,

    /// Per-request timeout in seconds (1-3600, default 10)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Extra request header, "Name: value" (repeatable)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// User-Agent header value
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Follow redirects instead of reporting 3xx responses
    #[arg(long)]
    pub follow_redirects: bool,

    /// Body hash algorithm: md5, sha1, sha256, or fast
    #[arg(long)]
    pub hash: Option<String>,

    /// Only show results with these status codes (alias: -mc)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub match_code: Vec<u16>,

    /// Hide results with these status codes (alias: -fc)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub filter_code: Vec<u16>,

    /// Only show results with these body lengths (alias: -ml)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub match_length: Vec<u64>,

    /// Hide results with these body lengths (alias: -fl)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub filter_length: Vec<u64>,

    /// Only show results where FIELD has one of the values, FIELD=V1,V2 (repeatable)
    #[arg(long = "match-field", value_name = "FIELD=VALUES")]
    pub match_fields: Vec<String>,

    /// Hide results where FIELD has one of the values, FIELD=V1,V2 (repeatable)
    #[arg(long = "filter-field", value_name = "FIELD=VALUES")]
    pub filter_fields: Vec<String>,

    /// Show the status code (alias: -sc)
    #[arg(long)]
    pub status_code: bool,

    /// Show the body length (alias: -cl)
    #[arg(long)]
    pub content_length: bool,

    /// Extract the page title
    #[arg(long)]
    pub title: bool,

    /// Fetch /favicon.ico and report its hash
    #[arg(long)]
    pub favicon: bool,

    /// Detect CDNs from response headers
    #[arg(long)]
    pub cdn: bool,

    /// Detect WAFs from response headers
    #[arg(long)]
    pub waf: bool,

    /// Also write output lines to this file
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Config file (default: $XDG_CONFIG_HOME/httprobe/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parses process arguments after rewriting legacy flags.
    #[must_use]
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_legacy_flags(std::env::args_os()))
    }

    /// Fallible variant of [`parse_normalized`](Self::parse_normalized) over
    /// explicit arguments.
    #[cfg(test)]
    pub fn try_parse_normalized_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_legacy_flags(args))
    }
}

/// Rewrites `-mc 200` style flags to their long forms; `-mc=200` works too.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for (legacy, long) in LEGACY_FLAGS {
                if text == *legacy {
                    return OsString::from(*long);
                }
                if let Some(value) = text
                    .strip_prefix(legacy)
                    .and_then(|rest| rest.strip_prefix('='))
                {
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}
