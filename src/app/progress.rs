//! Progress UI (spinner) for fetches.

use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use seqfetch_core::ChunkSink;

/// Creates the fetch spinner, or a hidden bar when progress is off.
pub(crate) fn fetch_spinner(enabled: bool, id: &str) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg} {bytes}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Fetching record {id}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Counts written bytes on a progress bar before handing chunks on.
pub(crate) struct ProgressSink<S> {
    inner: S,
    bar: ProgressBar,
}

impl<S> ProgressSink<S> {
    pub(crate) fn new(inner: S, bar: ProgressBar) -> Self {
        Self { inner, bar }
    }

    pub(crate) fn into_inner(self) -> S {
        self.bar.finish_and_clear();
        self.inner
    }
}

#[async_trait]
impl<S: ChunkSink> ChunkSink for ProgressSink<S> {
    fn destination(&self) -> &str {
        self.inner.destination()
    }

    async fn write_chunk(&mut self, chunk: &[u8]) -> std::io::Result<()> {
        self.inner.write_chunk(chunk).await?;
        self.bar.inc(chunk.len() as u64);
        Ok(())
    }

    async fn finish(&mut self) -> std::io::Result<()> {
        self.inner.finish().await
    }
}
