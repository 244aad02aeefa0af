//! Default User-Agent for probe requests.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/httprobe";

/// Default User-Agent for probe requests (identifies the tool).
#[must_use]
pub(crate) fn default_probe_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("httprobe/{version} (+{PROJECT_UA_URL})")
}
