//! Frequency table of matched substrings.

use std::collections::HashMap;
use std::fmt;

/// Line printed when a scan found nothing.
pub const NO_MATCHES_LINE: &str = "No matches found";

/// Counts of each distinct matched substring.
///
/// Reporting order is descending count; equal counts keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of `text`.
    pub fn add(&mut self, text: &str) {
        if let Some(&slot) = self.index.get(text) {
            self.entries[slot].1 += 1;
        } else {
            self.index.insert(text.to_string(), self.entries.len());
            self.entries.push((text.to_string(), 1));
        }
    }

    /// Occurrences of `text` so far.
    #[must_use]
    pub fn count(&self, text: &str) -> u64 {
        self.index.get(text).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Number of distinct substrings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries by descending count, first-seen order among equals.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self
            .entries
            .iter()
            .map(|(text, count)| (text.as_str(), *count))
            .collect();
        // Stable sort keeps insertion order for ties.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Human-readable summary: one `text: count` line per entry, or the
    /// single "no matches" line.
    #[must_use]
    pub fn report_lines(&self) -> Vec<String> {
        if self.is_empty() {
            return vec![NO_MATCHES_LINE.to_string()];
        }
        self.ranked()
            .into_iter()
            .map(|(text, count)| format!("{text}: {count}"))
            .collect()
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.report_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
