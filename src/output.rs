//! JSON-lines rendering of surfaced results.

use std::io::{self, Write};

use serde::Serialize;

use crate::predicate::PredicateSet;
use crate::probe::ProbeResult;

/// Output-only field selection. Predicates still see every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Include `status_code`.
    pub status_code: bool,
    /// Include `content_length`.
    pub content_length: bool,
}

#[derive(Serialize)]
struct OutputRecord<'a> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_hash: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    favicon_hash: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cdn_detected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    waf_detected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<'a> OutputRecord<'a> {
    fn new(result: &'a ProbeResult, options: OutputOptions) -> Self {
        Self {
            url: &result.url,
            status_code: result.status_code().filter(|_| options.status_code),
            content_length: result.content_length().filter(|_| options.content_length),
            content_type: result.content_type(),
            content_hash: result.content_hash(),
            title: result.title(),
            favicon_hash: result.favicon_hash(),
            cdn_detected: result.cdn_detected(),
            waf_detected: result.waf_detected(),
            error: result.error(),
        }
    }
}

/// Renders one result as a single JSON line (no trailing newline).
///
/// # Errors
///
/// Returns the serializer error, which only happens on writer failure.
pub fn render_line(result: &ProbeResult, options: OutputOptions) -> serde_json::Result<String> {
    serde_json::to_string(&OutputRecord::new(result, options))
}

/// Writes every result accepted by `predicates`, one line each.
///
/// Returns the number of lines written.
///
/// # Errors
///
/// Returns the first IO error from `writer`.
pub fn write_surfaced<W: Write>(
    writer: &mut W,
    results: &[ProbeResult],
    predicates: &PredicateSet,
    options: OutputOptions,
) -> io::Result<usize> {
    let mut written = 0;
    for result in results.iter().filter(|result| predicates.accepts(result)) {
        serde_json::to_writer(&mut *writer, &OutputRecord::new(result, options))?;
        writer.write_all(b"\n")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
