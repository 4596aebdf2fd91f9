//! Column classification for wide tables.

use melt_model::{Period, ReshapeConfig, ReshapeError, Result};

/// A period column with its parsed year-month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodColumn {
    /// Position among all input columns.
    pub index: usize,
    /// Trimmed header, kept verbatim as the output period label.
    pub label: String,
    pub period: Period,
}

/// Result of classifying the headers of a wide table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub category_index: usize,
    /// Trimmed header of the category column.
    pub category_header: String,
    /// Period columns in source left-to-right order.
    pub periods: Vec<PeriodColumn>,
    /// Indices of dropped aggregate columns.
    pub aggregates: Vec<usize>,
}

impl ColumnLayout {
    pub fn period_count(&self) -> usize {
        self.periods.len()
    }
}

/// Classify trimmed headers into category, aggregate and period columns.
///
/// The first header equal to the configured category name is the category
/// column. Every header equal to the aggregate name is dropped. All other
/// headers must parse as `YYYY-MM`; the first that does not fails the whole
/// table.
pub fn classify_columns(headers: &[String], config: &ReshapeConfig) -> Result<ColumnLayout> {
    let trimmed: Vec<&str> = headers.iter().map(|h| h.trim()).collect();

    let category_index = trimmed
        .iter()
        .position(|header| config.is_category(header))
        .ok_or_else(|| ReshapeError::MissingCategoryColumn {
            column: config.category_column.trim().to_string(),
        })?;

    let mut periods = Vec::new();
    let mut aggregates = Vec::new();
    for (index, header) in trimmed.iter().enumerate() {
        // Repeated category headers are excluded by name, like the first one.
        if index == category_index || config.is_category(header) {
            continue;
        }
        if config.is_aggregate(header) {
            aggregates.push(index);
            continue;
        }
        let period = Period::parse(header).ok_or_else(|| ReshapeError::PeriodParse {
            label: (*header).to_string(),
            column_index: index,
        })?;
        periods.push(PeriodColumn {
            index,
            label: (*header).to_string(),
            period,
        });
    }

    Ok(ColumnLayout {
        category_index,
        category_header: trimmed[category_index].to_string(),
        periods,
        aggregates,
    })
}
