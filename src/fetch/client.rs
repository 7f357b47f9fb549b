//! HTTP client wrapper for fetching records.
//!
//! The client asks the server for gzip but never decodes on its own: the
//! `Content-Encoding` of each response decides which filters the transfer
//! pipeline runs.

use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use reqwest::Client;
use reqwest::header::{ACCEPT_ENCODING, CACHE_CONTROL, CONTENT_ENCODING};
use tokio::fs::File;
use tokio::io::BufWriter;
use tokio_util::io::StreamReader;
use tracing::{debug, info, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use super::error::FetchError;
use crate::pipeline::{
    ChunkSink, FilterChain, TransferConfig, TransferOutcome, WriterSink, transfer,
};
use crate::user_agent;

/// Response body as an `AsyncRead` source for the chunk reader.
pub type BodyReader = StreamReader<BoxStream<'static, std::io::Result<Bytes>>, Bytes>;

/// An opened response whose body has not been read yet.
pub struct RemoteBody {
    /// Final URL after redirects.
    pub url: String,
    /// Raw `Content-Encoding` header, if any.
    pub content_encoding: Option<String>,
    /// `Content-Length` header, if any (encoded size).
    pub content_length: Option<u64>,
    /// The body.
    pub reader: BodyReader,
}

impl std::fmt::Debug for RemoteBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteBody")
            .field("url", &self.url)
            .field("content_encoding", &self.content_encoding)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// HTTP client for streaming record downloads.
///
/// Create once and reuse; reqwest pools connections.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client with default timeouts (30 s connect, 300 s total).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    pub fn new() -> Self {
        Self::new_with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the supplied
    /// configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new_with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            // Decoding belongs to the filter chain.
            .no_gzip()
            .user_agent(user_agent::default_fetch_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Sends the request and returns the unread body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`]/[`FetchError::Timeout`] when the
    /// request fails and [`FetchError::HttpStatus`] for non-2xx responses.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn open(&self, url: &Url) -> Result<RemoteBody, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT_ENCODING, "gzip")
            .header(CACHE_CONTROL, "max-age=0")
            .send()
            .await
            .map_err(|e| FetchError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url.as_str(), status.as_u16()));
        }

        let content_encoding = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = response.content_length();
        let final_url = response.url().to_string();
        debug!(
            status = status.as_u16(),
            encoding = content_encoding.as_deref().unwrap_or("identity"),
            content_length,
            "response headers received"
        );

        let stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(std::io::Error::other))
            .boxed();

        Ok(RemoteBody {
            url: final_url,
            content_encoding,
            content_length,
            reader: StreamReader::new(stream),
        })
    }

    /// Fetches `url` and streams the decoded body into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] for request failures, undecodable encodings
    /// and any pipeline failure while the body is transferred.
    #[instrument(skip(self, sink, config), fields(url = %url))]
    pub async fn fetch_to_sink<S>(
        &self,
        url: &Url,
        sink: S,
        config: &TransferConfig,
    ) -> Result<TransferOutcome<S>, FetchError>
    where
        S: ChunkSink + 'static,
    {
        let body = self.open(url).await?;
        let filters = FilterChain::for_content_encoding(body.content_encoding.as_deref())
            .map_err(|e| FetchError::encoding(url.as_str(), e))?;
        let reader = config
            .reader(body.reader, body.url)
            .map_err(|e| FetchError::transfer(url.as_str(), e.into()))?;

        let outcome = transfer(reader, filters, sink, config.queue_capacity())
            .await
            .map_err(|e| FetchError::transfer(url.as_str(), e))?;
        info!(
            bytes_received = outcome.bytes_read,
            bytes_decoded = outcome.bytes_written,
            "fetch complete"
        );
        Ok(outcome)
    }

    /// Fetches `url` into a file at `path`, flushed before returning.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_to_sink`](Self::fetch_to_sink), plus file creation
    /// failures.
    pub async fn fetch_to_file(
        &self,
        url: &Url,
        path: &Path,
        config: &TransferConfig,
    ) -> Result<TransferOutcome<WriterSink<BufWriter<File>>>, FetchError> {
        let sink = WriterSink::create_file(path)
            .await
            .map_err(|e| FetchError::transfer(url.as_str(), e))?;
        self.fetch_to_sink(url, sink, config).await
    }
}
