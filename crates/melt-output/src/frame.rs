//! DataFrame construction for long tables.

use melt_model::{CellValue, LongTable};
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, PolarsResult, Series};

/// Column type chosen for the value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Text,
}

/// Picks the narrowest column type holding every non-empty value.
///
/// All integers give `Int`, any mix of integers and floats gives `Float`,
/// all booleans give `Bool`; anything else, or no values at all, is `Text`.
pub fn value_kind<'a>(values: impl IntoIterator<Item = &'a CellValue>) -> ValueKind {
    let mut kind: Option<ValueKind> = None;
    for value in values {
        let next = match value {
            CellValue::Empty => continue,
            CellValue::Int(_) => ValueKind::Int,
            CellValue::Float(_) => ValueKind::Float,
            CellValue::Bool(_) => ValueKind::Bool,
            CellValue::Text(_) => return ValueKind::Text,
        };
        kind = Some(match (kind, next) {
            (None, next) => next,
            (Some(current), next) if current == next => current,
            (Some(ValueKind::Int | ValueKind::Float), ValueKind::Int | ValueKind::Float) => {
                ValueKind::Float
            }
            _ => return ValueKind::Text,
        });
    }
    kind.unwrap_or(ValueKind::Text)
}

/// Builds the six-column output frame.
///
/// Column names come from the table's output labels. Empty values are null.
pub fn long_table_frame(table: &LongTable) -> PolarsResult<DataFrame> {
    let labels = table.labels();
    let records = table.records();

    let sequence: Vec<i64> = records.iter().map(|r| r.sequence_number as i64).collect();
    let categories: Vec<&str> = records.iter().map(|r| r.category.as_str()).collect();
    let periods: Vec<&str> = records.iter().map(|r| r.period_label.as_str()).collect();
    let years: Vec<&str> = records.iter().map(|r| r.year.as_str()).collect();
    let months: Vec<&str> = records.iter().map(|r| r.month_label.as_str()).collect();

    let columns: Vec<Column> = vec![
        Series::new(labels.sequence.as_str().into(), sequence).into_column(),
        Series::new(labels.category.as_str().into(), categories).into_column(),
        Series::new(labels.period.as_str().into(), periods).into_column(),
        Series::new(labels.year.as_str().into(), years).into_column(),
        Series::new(labels.month.as_str().into(), months).into_column(),
        value_column(labels.value.as_str(), table),
    ];
    DataFrame::new(columns)
}

fn value_column(name: &str, table: &LongTable) -> Column {
    let values = table.records().iter().map(|r| &r.value);
    let series = match value_kind(values.clone()) {
        ValueKind::Int => {
            let data: Vec<Option<i64>> = values
                .map(|v| match v {
                    CellValue::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), data)
        }
        ValueKind::Float => {
            let data: Vec<Option<f64>> = values.map(CellValue::as_f64).collect();
            Series::new(name.into(), data)
        }
        ValueKind::Bool => {
            let data: Vec<Option<bool>> = values
                .map(|v| match v {
                    CellValue::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(name.into(), data)
        }
        ValueKind::Text => {
            let data: Vec<Option<String>> = values
                .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
                .collect();
            Series::new(name.into(), data)
        }
    };
    series.into_column()
}
