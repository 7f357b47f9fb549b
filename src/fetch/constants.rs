//! Constants for the fetch module (timeouts, efetch defaults).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes for large records).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// NCBI E-utilities efetch endpoint.
pub const EFETCH_ENDPOINT: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";

/// Nucleotide record fetched when no identifier is given.
pub const DEFAULT_RECORD_ID: &str = "30271926";
