//! Header-based CDN and WAF detection.
//!
//! Both checks are plain substring heuristics over response headers. False
//! negatives are expected; nothing here tries to rule out false positives.

use reqwest::header::HeaderMap;

/// Headers whose values name the serving CDN.
const CDN_HEADER_NAMES: &[&str] = &["server", "x-cdn"];

/// Vendor substrings matched (lowercased) against CDN header values.
const CDN_VENDORS: &[&str] = &[
    "cloudflare",
    "akamai",
    "fastly",
    "cloudfront",
    "incapsula",
    "imperva",
    "stackpath",
    "cdn77",
    "keycdn",
    "bunnycdn",
    "edgecast",
    "azureedge",
    "limelight",
    "sucuri",
];

/// Substrings matched against lowercased header *names*.
const WAF_HEADER_INDICATORS: &[&str] = &[
    "x-sucuri-id",
    "x-sucuri-cache",
    "x-firewall",
    "x-waf",
    "x-protected-by",
    "x-iinfo",
    "cloudflare",
];

/// Returns `true` if a `Server` or `X-CDN` header names a known CDN vendor.
#[must_use]
pub fn detect_cdn(headers: &HeaderMap) -> bool {
    CDN_HEADER_NAMES.iter().any(|name| {
        headers.get_all(*name).iter().any(|value| {
            // Non-visible-ASCII values can't be inspected; skip them.
            value.to_str().is_ok_and(|value| {
                let value = value.to_ascii_lowercase();
                CDN_VENDORS.iter().any(|vendor| value.contains(vendor))
            })
        })
    })
}

/// Returns `true` if any header name contains a known WAF indicator.
///
/// Values are ignored.
#[must_use]
pub fn detect_waf(headers: &HeaderMap) -> bool {
    // HeaderName is always stored lowercase.
    headers.keys().any(|name| {
        let name = name.as_str();
        WAF_HEADER_INDICATORS
            .iter()
            .any(|indicator| name.contains(indicator))
    })
}
