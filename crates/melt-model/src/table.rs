//! Wide input and long output tables.

use std::path::{Path, PathBuf};

use crate::options::OutputLabels;
use crate::value::CellValue;

/// A loaded wide-format table: one row per category, one column per period.
///
/// Headers are kept exactly as read; trimming happens during reshaping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// File the table was read from, if any.
    pub source: Option<PathBuf>,
}

impl WideTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            headers,
            rows,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Number of data rows (the header row is not counted).
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Cell at `row`/`col`; cells past the end of a short row read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }
}

/// One row of the long output table.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    /// 1-based position in the final ordering.
    pub sequence_number: usize,
    pub category: String,
    /// The trimmed source header, e.g. `2024-03`.
    pub period_label: String,
    /// Derived year label, e.g. `2024年`.
    pub year: String,
    /// Derived zero-padded month label, e.g. `03月`.
    pub month_label: String,
    pub value: CellValue,
}

/// The reshaped long-format table.
///
/// Records are grouped by category in first-seen source order and ordered
/// chronologically within a category. The table is immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    records: Vec<LongRecord>,
    labels: OutputLabels,
}

impl LongTable {
    pub fn new(records: Vec<LongRecord>, labels: OutputLabels) -> Self {
        Self { records, labels }
    }

    pub fn records(&self) -> &[LongRecord] {
        &self.records
    }

    pub fn labels(&self) -> &OutputLabels {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct categories in output order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.category.as_str()) {
                seen.push(&record.category);
            }
        }
        seen
    }

    pub fn into_records(self) -> Vec<LongRecord> {
        self.records
    }
}
