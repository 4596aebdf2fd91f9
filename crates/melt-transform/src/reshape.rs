//! The wide-to-long reshape pipeline.
//!
//! Stages, in order:
//! 1. Trim headers and classify columns (see [`classify_columns`])
//! 2. Melt every row into one tuple per period column
//! 3. Stable sort by (first-seen category rank, period)
//! 4. Derive year/month labels and assign dense sequence numbers
//!
//! Period headers are parsed during classification, so a bad header fails
//! the table before any tuple is produced, even when the table has no rows.

use std::collections::BTreeMap;

use melt_model::{CellValue, LongRecord, LongTable, Period, ReshapeConfig, Result, WideTable};

use crate::layout::{ColumnLayout, classify_columns};
use crate::observer::{NoopObserver, ReshapeEvent, ReshapeObserver};

/// Intermediate melted tuple; borrows from the source table and layout.
struct Melted<'a> {
    category_rank: usize,
    period: Period,
    row: usize,
    period_label: &'a str,
    value: &'a CellValue,
}

/// Reshape a wide table into a long table.
///
/// Fails with [`melt_model::ReshapeError`] without producing any records if
/// the category column is missing or any period header does not parse.
pub fn reshape(wide: &WideTable, config: &ReshapeConfig) -> Result<LongTable> {
    reshape_with_observer(wide, config, &mut NoopObserver)
}

/// Same as [`reshape`], reporting progress to `observer`.
pub fn reshape_with_observer(
    wide: &WideTable,
    config: &ReshapeConfig,
    observer: &mut dyn ReshapeObserver,
) -> Result<LongTable> {
    let layout = classify_columns(&wide.headers, config)?;
    observer.on_event(&ReshapeEvent::ColumnsClassified {
        category_column: &layout.category_header,
        period_columns: layout.period_count(),
        aggregate_dropped: !layout.aggregates.is_empty(),
    });

    let categories: Vec<String> = (0..wide.height())
        .map(|row| wide.cell(row, layout.category_index).to_string())
        .collect();
    let ranks = first_seen_ranks(&categories);

    let mut melted = melt(wide, &layout, &categories, &ranks, observer);
    // `sort_by_key` is stable: duplicate period columns keep melt order.
    melted.sort_by_key(|tuple| (tuple.category_rank, tuple.period));

    let records: Vec<LongRecord> = melted
        .into_iter()
        .enumerate()
        .map(|(idx, tuple)| LongRecord {
            sequence_number: idx + 1,
            category: categories[tuple.row].clone(),
            period_label: tuple.period_label.to_string(),
            year: tuple.period.year_label(&config.year_suffix),
            month_label: tuple.period.month_label(&config.month_suffix),
            value: tuple.value.clone(),
        })
        .collect();

    observer.on_event(&ReshapeEvent::Completed {
        records: records.len(),
        categories: ranks.len(),
    });

    Ok(LongTable::new(records, config.labels.clone()))
}

/// Rank of each distinct category by its first appearance.
fn first_seen_ranks(categories: &[String]) -> BTreeMap<&str, usize> {
    let mut ranks = BTreeMap::new();
    for category in categories {
        let next = ranks.len();
        ranks.entry(category.as_str()).or_insert(next);
    }
    ranks
}

fn melt<'a>(
    wide: &'a WideTable,
    layout: &'a ColumnLayout,
    categories: &'a [String],
    ranks: &BTreeMap<&str, usize>,
    observer: &mut dyn ReshapeObserver,
) -> Vec<Melted<'a>> {
    let mut melted = Vec::with_capacity(wide.height() * layout.period_count());
    for (row, category) in categories.iter().enumerate() {
        observer.on_event(&ReshapeEvent::CategoryStarted {
            category,
            row_index: row,
        });
        let category_rank = ranks.get(category.as_str()).copied().unwrap_or_default();
        for column in &layout.periods {
            let value = wide.cell(row, column.index);
            observer.on_event(&ReshapeEvent::CellMelted {
                category,
                period_label: &column.label,
                value,
            });
            melted.push(Melted {
                category_rank,
                period: column.period,
                row,
                period_label: &column.label,
                value,
            });
        }
    }
    melted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_ranks_ignore_repeats() {
        let categories = vec![
            "外科".to_string(),
            "内科".to_string(),
            "外科".to_string(),
            "儿科".to_string(),
        ];
        let ranks = first_seen_ranks(&categories);
        assert_eq!(ranks.get("外科"), Some(&0));
        assert_eq!(ranks.get("内科"), Some(&1));
        assert_eq!(ranks.get("儿科"), Some(&2));
    }
}
