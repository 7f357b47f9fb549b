//! File names for persisted record copies.

use chrono::{NaiveDate, Utc};

/// Extension of saved record copies.
pub const SAVED_COPY_EXTENSION: &str = ".xml";

/// Date format used in saved copy names.
pub const SAVED_COPY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Stem used when an identifier sanitizes to nothing.
const FALLBACK_STEM: &str = "record";

/// Today's date in UTC.
#[must_use]
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Name for a saved copy of `identifier` taken on `date`:
/// `<sanitized-id>_<YYYY-MM-DD>.xml`.
///
/// ```
/// use chrono::NaiveDate;
/// use seqfetch_core::naming::saved_copy_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(saved_copy_name("NC_045512.2", date), "NC_045512.2_2024-03-09.xml");
/// ```
#[must_use]
pub fn saved_copy_name(identifier: &str, date: NaiveDate) -> String {
    let stem = sanitize_component(identifier);
    let stem = if stem.is_empty() {
        FALLBACK_STEM
    } else {
        stem.as_str()
    };
    format!(
        "{stem}_{}{SAVED_COPY_EXTENSION}",
        date.format(SAVED_COPY_DATE_FORMAT)
    )
}

/// Replaces path separators, reserved and whitespace characters with single
/// underscores and trims them from both ends.
pub(crate) fn sanitize_component(value: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in value.chars() {
        let keep = ch.is_alphanumeric() || matches!(ch, '-' | '.');
        if keep {
            out.push(ch);
            prev_sep = false;
        } else if !prev_sep {
            out.push('_');
            prev_sep = true;
        }
    }
    let trimmed = out.trim_matches('_');
    // Dots alone would name the current or parent directory.
    if trimmed.chars().all(|c| c == '.') {
        return String::new();
    }
    trimmed.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_saved_copy_name_pads_month_and_day() {
        assert_eq!(
            saved_copy_name("30271926", date(2026, 1, 5)),
            "30271926_2026-01-05.xml"
        );
        assert_eq!(
            saved_copy_name("30271926", date(2024, 2, 29)),
            "30271926_2024-02-29.xml"
        );
    }

    #[test]
    fn test_today_utc_names_saved_copy() {
        let today = today_utc();
        assert!(today.year() >= 2024);
        assert!(saved_copy_name("x", today).ends_with(&format!(
            "{}{SAVED_COPY_EXTENSION}",
            today.format(SAVED_COPY_DATE_FORMAT)
        )));
    }

    #[test]
    fn test_saved_copy_name_sanitizes_identifier() {
        let on = date(2026, 1, 5);
        assert_eq!(
            saved_copy_name("../etc/passwd", on),
            ".._etc_passwd_2026-01-05.xml"
        );
        assert_eq!(saved_copy_name("a b,c", on), "a_b_c_2026-01-05.xml");
    }

    #[test]
    fn test_saved_copy_name_falls_back_when_empty() {
        let on = date(2026, 1, 5);
        assert_eq!(saved_copy_name("///", on), "record_2026-01-05.xml");
        assert_eq!(saved_copy_name("..", on), "record_2026-01-05.xml");
    }
}
