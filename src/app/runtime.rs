//! Orchestrates one fetch/scan/save run.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use seqfetch_core::pipeline::{PersistMethod, TransferConfig, WriterSink, persist_copy};
use seqfetch_core::scan::{CsvRecorder, ScanSummary, SequenceScanner};
use seqfetch_core::{HttpClient, saved_copy_name, today_utc};

use super::config::{RunConfig, SourceMode};
use super::progress::{ProgressSink, fetch_spinner};

/// Result of a completed run.
#[derive(Debug)]
pub(crate) struct RunReport {
    pub summary: ScanSummary,
    pub saved_copy: Option<PathBuf>,
}

pub(crate) async fn run(config: RunConfig) -> Result<RunReport> {
    let scanner = SequenceScanner::new(config.pattern.clone(), &config.element);

    let (summary, saved_copy) = match &config.source {
        SourceMode::Remote { url, id } => {
            let staging = tempfile::NamedTempFile::new()
                .context("Failed to create a temporary file for the fetched record")?;
            let sink = WriterSink::create_file(staging.path()).await?;
            let bar = fetch_spinner(config.show_progress, id);

            let client = HttpClient::new();
            let outcome = client
                .fetch_to_sink(url, ProgressSink::new(sink, bar), &config.transfer)
                .await?;
            drop(outcome.sink.into_inner());
            info!(id = %id, bytes = outcome.bytes_written, "record fetched");

            let summary = scan_file(scanner, staging.path(), &config.output).await?;
            let saved = save_copy(&config, staging.path(), id).await?;
            (summary, saved)
        }
        SourceMode::Local(path) => {
            let summary = scan_file(scanner, path, &config.output).await?;
            let identifier = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let saved = save_copy(&config, path, &identifier).await?;
            (summary, saved)
        }
    };

    info!(
        elements = summary.elements,
        matches = summary.matches,
        output = %config.output.display(),
        "scan complete"
    );
    Ok(RunReport {
        summary,
        saved_copy,
    })
}

/// Scans `source` on a blocking thread, writing match rows to `output`.
async fn scan_file(scanner: SequenceScanner, source: &Path, output: &Path) -> Result<ScanSummary> {
    let source = source.to_path_buf();
    let output = output.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<ScanSummary> {
        let file = File::create(&output)
            .with_context(|| format!("Failed to create output file {}", output.display()))?;
        let mut recorder = CsvRecorder::new(BufWriter::new(file));
        let summary = scanner.scan_path(&source, &mut recorder)?;
        Ok(summary)
    })
    .await
    .context("Scan task failed")?
}

async fn save_copy(config: &RunConfig, source: &Path, identifier: &str) -> Result<Option<PathBuf>> {
    let Some(dir) = &config.save_dir else {
        return Ok(None);
    };
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create save directory {}", dir.display()))?;
    let dest = dir.join(saved_copy_name(identifier, today_utc()));
    let method = persist(source, &dest, &config.transfer).await?;
    debug!(?method, dest = %dest.display(), "copy saved");
    Ok(Some(dest))
}

async fn persist(source: &Path, dest: &Path, transfer: &TransferConfig) -> Result<PersistMethod> {
    // A stale copy from an earlier run today would block the hard link.
    let exists = tokio::fs::try_exists(dest)
        .await
        .with_context(|| format!("Failed to check for an existing copy at {}", dest.display()))?;
    if exists {
        tokio::fs::remove_file(dest)
            .await
            .with_context(|| format!("Failed to replace {}", dest.display()))?;
    }
    Ok(persist_copy(source, dest, transfer).await?)
}
