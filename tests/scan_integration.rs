//! Integration tests for the sequence scanner over files on disk.

mod support;

use std::fs;
use std::io::BufWriter;

use regex::Regex;
use seqfetch_core::scan::{CsvRecorder, MatchRecord, ScanError, SequenceScanner};
use tempfile::TempDir;

#[test]
fn test_scan_path_writes_csv_rows() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("record.xml");
    fs::write(&record, support::tinyseq_document("AAAATAGCCCCXAAAATAGCCCC")).unwrap();
    let output = dir.path().join("matches.csv");

    let scanner = SequenceScanner::for_sequences("AAAATAGCCCC").unwrap();
    let mut recorder = CsvRecorder::new(BufWriter::new(fs::File::create(&output).unwrap()));
    let summary = scanner.scan_path(&record, &mut recorder).unwrap();
    drop(recorder);

    assert_eq!(summary.matches, 2);
    assert_eq!(summary.table.report_lines(), vec!["AAAATAGCCCC: 2"]);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "match,start,end\nAAAATAGCCCC,1,11\nAAAATAGCCCC,13,23\n"
    );
}

#[test]
fn test_scan_path_without_match() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("record.xml");
    fs::write(&record, support::tinyseq_document(&"C".repeat(500))).unwrap();

    let mut records: Vec<MatchRecord> = Vec::new();
    let summary = SequenceScanner::for_sequences("GATTACA")
        .unwrap()
        .scan_path(&record, &mut records)
        .unwrap();

    assert!(records.is_empty());
    assert_eq!(summary.elements, 1);
    assert_eq!(summary.table.report_lines(), vec!["No matches found"]);
}

#[test]
fn test_rescan_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("record.xml");
    fs::write(&record, support::tinyseq_document(&support::nucleotides(30_000))).unwrap();
    let scanner = SequenceScanner::new(Regex::new("TA[AG]").unwrap(), "TSeq_sequence");

    let mut first: Vec<MatchRecord> = Vec::new();
    let first_summary = scanner.scan_path(&record, &mut first).unwrap();
    let mut second: Vec<MatchRecord> = Vec::new();
    let second_summary = scanner.scan_path(&record, &mut second).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_eq!(first_summary, second_summary);
    assert_eq!(first_summary.table.total(), first_summary.matches);
}

#[test]
fn test_matches_agree_with_direct_search() {
    let sequence = support::nucleotides(10_000);
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("record.xml");
    fs::write(&record, support::tinyseq_document(&sequence)).unwrap();
    let pattern = Regex::new("ACG+T").unwrap();

    let mut records: Vec<MatchRecord> = Vec::new();
    SequenceScanner::new(pattern.clone(), "TSeq_sequence")
        .scan_path(&record, &mut records)
        .unwrap();

    let expected: Vec<MatchRecord> = pattern
        .find_iter(&sequence)
        .map(|m| MatchRecord::new(m.as_str(), m.start() + 1, m.end()))
        .collect();
    assert_eq!(records, expected);
}

#[test]
fn test_truncated_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let record = dir.path().join("partial.xml");
    let document = support::tinyseq_document(&support::nucleotides(2_000));
    let cut = document.find("<TSeq_sequence>").unwrap() + 500;
    fs::write(&record, &document[..cut]).unwrap();

    let mut records: Vec<MatchRecord> = Vec::new();
    let err = SequenceScanner::for_sequences("ACGT")
        .unwrap()
        .scan_path(&record, &mut records)
        .unwrap_err();

    assert!(
        matches!(err, ScanError::Truncated { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn test_missing_file_is_open_error() {
    let dir = TempDir::new().unwrap();
    let mut records: Vec<MatchRecord> = Vec::new();
    let err = SequenceScanner::for_sequences("A")
        .unwrap()
        .scan_path(&dir.path().join("absent.xml"), &mut records)
        .unwrap_err();
    assert!(matches!(err, ScanError::Open { .. }), "{err:?}");
}
