//! Constants for the probe module (timeouts, favicon location).

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upper bound accepted for the per-request timeout.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Connect timeout cap; the overall request timeout still applies.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Maximum redirect hops when redirect following is enabled.
pub const MAX_REDIRECTS: usize = 10;

/// Favicon path resolved against the target's origin.
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Title placeholder when a document has no `<title>` element.
pub const NO_TITLE: &str = "N/A";
