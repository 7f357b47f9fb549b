//! Nucleotide pattern scanning over efetch XML.
//!
//! The scanner pulls events from the document, collects the text of each
//! designated element and hands every regex match to a [`MatchRecorder`]
//! before moving on.
//!
//! ```
//! use seqfetch_core::scan::{MatchRecord, SequenceScanner};
//!
//! let xml = "<TSeq><TSeq_sequence>AAAATAGCCCCXAAAATAGCCCC</TSeq_sequence></TSeq>";
//! let scanner = SequenceScanner::for_sequences("AAAATAGCCCC").unwrap();
//! let mut records: Vec<MatchRecord> = Vec::new();
//! let summary = scanner.scan_reader(xml.as_bytes(), "inline", &mut records).unwrap();
//!
//! assert_eq!(records[1], MatchRecord::new("AAAATAGCCCC", 13, 23));
//! assert_eq!(summary.table.report_lines(), vec!["AAAATAGCCCC: 2"]);
//! ```

mod error;
mod frequency;
mod record;
mod scanner;

pub use error::ScanError;
pub use frequency::{FrequencyTable, NO_MATCHES_LINE};
pub use record::{CsvRecorder, MatchRecord, MatchRecorder};
pub use scanner::{DEFAULT_SEQUENCE_ELEMENT, ScanSummary, SequenceScanner};
