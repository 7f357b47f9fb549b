//! Remote record fetching.
//!
//! Builds the efetch request URL, opens the response and streams its body
//! through the transfer pipeline. Retries and caching are left to callers.
//!
//! # Example
//!
//! ```no_run
//! use seqfetch_core::fetch::{EFETCH_ENDPOINT, HttpClient, efetch_url};
//! use seqfetch_core::pipeline::TransferConfig;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let url = efetch_url(EFETCH_ENDPOINT, "30271926")?;
//! let outcome = client
//!     .fetch_to_file(&url, Path::new("record.xml"), &TransferConfig::default())
//!     .await?;
//! println!("decoded {} bytes", outcome.bytes_written);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod query;

pub use client::{BodyReader, HttpClient, RemoteBody};
pub use constants::{CONNECT_TIMEOUT_SECS, DEFAULT_RECORD_ID, EFETCH_ENDPOINT, READ_TIMEOUT_SECS};
pub use error::FetchError;
pub use query::{build_request_url, efetch_url};
