//! Request URL construction.

use url::Url;

use super::error::FetchError;

/// Builds a request URL from `base` and `params`.
///
/// Query pairs already present on `base` are kept unless `params` overrides
/// a parameter of the same name; overridden names are replaced entirely
/// (every earlier occurrence is dropped). New pairs are appended in order.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if `base` does not parse.
///
/// # Examples
///
/// ```
/// use seqfetch_core::fetch::build_request_url;
///
/// let url = build_request_url(
///     "https://example.com/efetch?db=protein&tool=x",
///     &[("db", "nucleotide")],
/// )
/// .unwrap();
/// assert_eq!(url.as_str(), "https://example.com/efetch?tool=x&db=nucleotide");
/// ```
pub fn build_request_url(base: &str, params: &[(&str, &str)]) -> Result<Url, FetchError> {
    let mut url = Url::parse(base).map_err(|e| FetchError::invalid_url(base, e))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !params.iter().any(|(key, _)| *name == *key))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    url.set_query(None);
    if kept.is_empty() && params.is_empty() {
        return Ok(url);
    }

    {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &kept {
            pairs.append_pair(name, value);
        }
        for (name, value) in params {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}

/// Builds the efetch URL for one nucleotide record in TinySeq XML.
///
/// # Errors
///
/// Returns [`FetchError::InvalidUrl`] if `endpoint` does not parse.
pub fn efetch_url(endpoint: &str, record_id: &str) -> Result<Url, FetchError> {
    build_request_url(
        endpoint,
        &[
            ("db", "nucleotide"),
            ("id", record_id),
            ("rettype", "fasta"),
            ("retmode", "xml"),
        ],
    )
}
