//! Match records and where they are written.

use std::io::Write;

/// One pattern occurrence inside a scanned element.
///
/// Offsets are 1-based, inclusive, and count characters from the start of
/// the element's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// The matched text.
    pub text: String,
    /// Position of the first matched character.
    pub start: usize,
    /// Position of the last matched character.
    pub end: usize,
}

impl MatchRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// Receives match records as the scan finds them.
pub trait MatchRecorder {
    /// Stores one record.
    ///
    /// # Errors
    ///
    /// Returns the destination's IO error.
    fn record(&mut self, record: &MatchRecord) -> std::io::Result<()>;

    /// Flushes buffered records. Called once after the scan.
    ///
    /// # Errors
    ///
    /// Returns the destination's IO error.
    fn finish(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl MatchRecorder for Vec<MatchRecord> {
    fn record(&mut self, record: &MatchRecord) -> std::io::Result<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Writes records as CSV rows under a `match,start,end` header.
#[derive(Debug)]
pub struct CsvRecorder<W: Write> {
    writer: W,
    header_written: bool,
}

impl<W: Write> CsvRecorder<W> {
    /// Column names, in row order.
    pub const HEADER: &'static str = "match,start,end";

    /// Wraps `writer`. The header is written with the first row, or on
    /// `finish` when there are no rows.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ensure_header(&mut self) -> std::io::Result<()> {
        if !self.header_written {
            writeln!(self.writer, "{}", Self::HEADER)?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> MatchRecorder for CsvRecorder<W> {
    fn record(&mut self, record: &MatchRecord) -> std::io::Result<()> {
        self.ensure_header()?;
        writeln!(
            self.writer,
            "{},{},{}",
            csv_field(&record.text),
            record.start,
            record.end
        )
    }

    fn finish(&mut self) -> std::io::Result<()> {
        self.ensure_header()?;
        self.writer.flush()
    }
}

fn csv_field(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\"")).into()
    } else {
        value.into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_recorder_writes_header_and_rows() {
        let mut recorder = CsvRecorder::new(Vec::new());
        recorder
            .record(&MatchRecord::new("AAAATAGCCCC", 1, 11))
            .unwrap();
        recorder
            .record(&MatchRecord::new("AAAATAGCCCC", 13, 23))
            .unwrap();
        recorder.finish().unwrap();

        let out = String::from_utf8(recorder.into_inner()).unwrap();
        assert_eq!(
            out,
            "match,start,end\nAAAATAGCCCC,1,11\nAAAATAGCCCC,13,23\n"
        );
    }

    #[test]
    fn test_csv_recorder_without_rows_writes_header_only() {
        let mut recorder = CsvRecorder::new(Vec::new());
        recorder.finish().unwrap();
        assert_eq!(recorder.into_inner(), b"match,start,end\n");
    }

    #[test]
    fn test_csv_field_quotes_special_characters() {
        assert_eq!(csv_field("ACGT"), "ACGT");
        assert_eq!(csv_field("A,C"), "\"A,C\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_vec_recorder_collects() {
        let mut records: Vec<MatchRecord> = Vec::new();
        records.record(&MatchRecord::new("GATTACA", 3, 9)).unwrap();
        assert_eq!(records, vec![MatchRecord::new("GATTACA", 3, 9)]);
    }
}
