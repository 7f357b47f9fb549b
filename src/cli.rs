//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use seqfetch_core::fetch::{DEFAULT_RECORD_ID, EFETCH_ENDPOINT};
use seqfetch_core::pipeline::{DEFAULT_CHUNK_SIZE, DEFAULT_QUEUE_CAPACITY, MAX_QUEUE_CAPACITY};
use seqfetch_core::scan::DEFAULT_SEQUENCE_ELEMENT;

/// Default file for match records.
pub const DEFAULT_OUTPUT: &str = "matches.csv";

/// Search for nucleotide sequences.
///
/// Fetches a nucleotide record from NCBI efetch (or reads a saved XML copy),
/// scans its sequence for PATTERN and writes every match with its position.
#[derive(Parser, Debug)]
#[command(name = "seqfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Regular expression to search for in the sequence
    pub pattern: String,

    /// Nucleotide record identifier to fetch
    #[arg(long, default_value = DEFAULT_RECORD_ID, conflicts_with = "file")]
    pub id: String,

    /// Scan a local XML file instead of fetching
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// efetch endpoint URL
    #[arg(long, default_value = EFETCH_ENDPOINT)]
    pub endpoint: String,

    /// CSV file for match records
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Keep a dated copy of the scanned record
    #[arg(short = 's', long)]
    pub save: bool,

    /// Directory for saved copies
    #[arg(long, default_value = ".", requires = "save")]
    pub save_dir: PathBuf,

    /// XML element holding the sequence text
    #[arg(long, default_value = DEFAULT_SEQUENCE_ELEMENT)]
    pub element: String,

    /// Match the pattern case-insensitively
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Bytes per transfer chunk
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = parse_chunk_size)]
    pub chunk_size: usize,

    /// Unacknowledged chunks allowed in flight (1-1024)
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY, value_parser = parse_queue_capacity)]
    pub queue_capacity: usize,

    /// Rather than the simplistic error messages, show developer-useful information
    #[arg(long)]
    pub debug: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_chunk_size(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(value) => Ok(value),
        Err(_) => Err(format!("`{raw}` is not a whole number")),
    }
}

fn parse_queue_capacity(raw: &str) -> Result<usize, String> {
    let value: usize = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a whole number"))?;
    if (1..=MAX_QUEUE_CAPACITY).contains(&value) {
        Ok(value)
    } else {
        Err(format!("must be between 1 and {MAX_QUEUE_CAPACITY}"))
    }
}
