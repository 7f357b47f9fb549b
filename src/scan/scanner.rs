//! Pull-parsing pattern scanner.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use tracing::{debug, instrument};

use super::error::ScanError;
use super::frequency::FrequencyTable;
use super::record::{MatchRecord, MatchRecorder};

/// Element holding the nucleotide sequence in efetch XML output.
pub const DEFAULT_SEQUENCE_ELEMENT: &str = "TSeq_sequence";

/// Totals from one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Designated elements scanned.
    pub elements: u64,
    /// Matches recorded across all elements.
    pub matches: u64,
    /// Counts per distinct matched substring.
    pub table: FrequencyTable,
}

/// Scans the text of one element type for a regular expression.
///
/// Text is released after each element closes, so memory use is bounded by
/// the largest designated element rather than the document.
#[derive(Debug, Clone)]
pub struct SequenceScanner {
    pattern: Regex,
    element: String,
}

impl SequenceScanner {
    /// Creates a scanner matching `pattern` inside every `element`.
    #[must_use]
    pub fn new(pattern: Regex, element: &str) -> Self {
        Self {
            pattern,
            element: element.to_string(),
        }
    }

    /// Compiles `pattern` and scans the default sequence element.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Pattern`] when `pattern` does not compile.
    pub fn for_sequences(pattern: &str) -> Result<Self, ScanError> {
        let regex = Regex::new(pattern).map_err(|source| ScanError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self::new(regex, DEFAULT_SEQUENCE_ELEMENT))
    }

    /// The compiled search pattern.
    #[must_use]
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Name of the scanned element.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Scans the XML document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Open`] when the file cannot be opened, otherwise
    /// whatever [`scan_reader`](Self::scan_reader) returns.
    #[instrument(skip(self, recorder), fields(path = %path.display()))]
    pub fn scan_path<M: MatchRecorder + ?Sized>(
        &self,
        path: &Path,
        recorder: &mut M,
    ) -> Result<ScanSummary, ScanError> {
        let file = File::open(path).map_err(|source| ScanError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.scan_reader(
            BufReader::new(file),
            &path.display().to_string(),
            recorder,
        )
    }

    /// Scans an XML document read from `source`.
    ///
    /// Each match is handed to `recorder` as soon as its element closes.
    /// Nested occurrences of the element count as part of the outermost one.
    ///
    /// # Errors
    ///
    /// - [`ScanError::Malformed`] when the parser rejects the document
    /// - [`ScanError::Truncated`] when input ends inside an element
    /// - [`ScanError::Record`] when the recorder fails
    pub fn scan_reader<R: BufRead, M: MatchRecorder + ?Sized>(
        &self,
        source: R,
        label: &str,
        recorder: &mut M,
    ) -> Result<ScanSummary, ScanError> {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().trim_text(false);

        let target = self.element.as_bytes();
        let mut summary = ScanSummary::default();
        let mut buf = Vec::new();
        let mut text = String::new();
        let mut depth = 0usize;
        // Depth at which the outermost open target element started.
        let mut inside: Option<usize> = None;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|source| malformed(label, &reader, source))?;
            match event {
                Event::Start(start) => {
                    depth += 1;
                    if inside.is_none() && start.name().as_ref() == target {
                        inside = Some(depth);
                    }
                }
                Event::End(_) => {
                    if inside == Some(depth) {
                        inside = None;
                        summary.elements += 1;
                        self.scan_element(&text, &mut summary, recorder)?;
                        text.clear();
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Empty(empty) => {
                    if inside.is_none() && empty.name().as_ref() == target {
                        summary.elements += 1;
                    }
                }
                Event::Text(raw) if inside.is_some() => {
                    let unescaped = raw
                        .unescape()
                        .map_err(|source| malformed(label, &reader, source))?;
                    text.push_str(&unescaped);
                }
                Event::CData(raw) if inside.is_some() => {
                    text.push_str(&String::from_utf8_lossy(&raw));
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if depth != 0 {
            return Err(ScanError::Truncated {
                label: label.to_string(),
                open: depth,
            });
        }

        recorder
            .finish()
            .map_err(|source| ScanError::Record { source })?;
        debug!(
            elements = summary.elements,
            matches = summary.matches,
            distinct = summary.table.len(),
            "scan complete"
        );
        Ok(summary)
    }

    fn scan_element<M: MatchRecorder + ?Sized>(
        &self,
        text: &str,
        summary: &mut ScanSummary,
        recorder: &mut M,
    ) -> Result<(), ScanError> {
        // Byte offsets from the regex are converted to char offsets
        // incrementally since matches arrive left to right.
        let mut byte_cursor = 0;
        let mut chars_before = 0;
        for found in self.pattern.find_iter(text) {
            if found.as_str().is_empty() {
                continue;
            }
            chars_before += text[byte_cursor..found.start()].chars().count();
            let length = found.as_str().chars().count();
            let record = MatchRecord::new(
                found.as_str(),
                chars_before + 1,
                chars_before + length,
            );
            byte_cursor = found.end();
            chars_before += length;

            recorder
                .record(&record)
                .map_err(|source| ScanError::Record { source })?;
            summary.table.add(&record.text);
            summary.matches += 1;
        }
        Ok(())
    }
}

fn malformed<R>(label: &str, reader: &Reader<R>, source: quick_xml::Error) -> ScanError {
    ScanError::Malformed {
        label: label.to_string(),
        position: u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX),
        source,
    }
}
