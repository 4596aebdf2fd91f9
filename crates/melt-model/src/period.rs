//! Calendar year-month periods parsed from column headers.
//!
//! Period headers use one fixed pattern: a 4-digit year, a hyphen and a
//! 2-digit month (`2024-03`). Nothing else is accepted, including single
//! digit months, day components or other separators.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// A parsed year-month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    /// First day of the month.
    date: NaiveDate,
}

impl Period {
    /// Parses a `YYYY-MM` label.
    ///
    /// Returns `None` if the label does not match the pattern exactly or the
    /// month is outside 01-12.
    ///
    /// # Examples
    ///
    /// ```
    /// use melt_model::Period;
    ///
    /// let period = Period::parse("2023-07").unwrap();
    /// assert_eq!(period.year(), 2023);
    /// assert_eq!(period.month(), 7);
    /// assert!(Period::parse("2023-7").is_none());
    /// ```
    pub fn parse(label: &str) -> Option<Self> {
        let bytes = label.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return None;
        }
        let (year, month) = (&label[..4], &label[5..]);
        if !year.bytes().all(|b| b.is_ascii_digit()) || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, 1).map(|date| Self { date })
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Year number followed by `suffix`, e.g. `2024年`.
    pub fn year_label(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.year())
    }

    /// Zero-padded month followed by `suffix`, e.g. `03月`.
    pub fn month_label(&self, suffix: &str) -> String {
        format!("{:02}{suffix}", self.month())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}
