//! User-Agent string for E-utilities requests.
//!
//! NCBI asks E-utilities clients to identify themselves, so the tool name,
//! version and project URL are sent with every fetch.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/seqfetch";

/// Default User-Agent for fetch requests.
#[must_use]
pub(crate) fn default_fetch_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("seqfetch/{version} (nucleotide-search-tool; +{PROJECT_UA_URL})")
}
