//! Workbook reading via calamine.
//!
//! Only the first worksheet is read. Its first row is the header row; the
//! used range starts at the first non-empty cell, as in spreadsheet loaders.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use melt_model::{CellValue, WideTable, format_numeric};

use crate::error::{IngestError, Result};

/// Reads the first worksheet of a workbook into a wide table.
pub fn read_workbook_wide_table(path: &Path) -> Result<WideTable> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut workbook = open_workbook_auto(path).map_err(|e| IngestError::Workbook {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let sheet_names = workbook.sheet_names();
    let Some(sheet_name) = sheet_names.first() else {
        return Err(IngestError::EmptyWorkbook {
            path: path.to_path_buf(),
        });
    };
    if sheet_names.len() > 1 {
        tracing::debug!(
            path = %path.display(),
            sheet = %sheet_name,
            ignored = sheet_names.len() - 1,
            "reading first worksheet only"
        );
    }

    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| IngestError::Workbook {
            path: path.to_path_buf(),
            message: format!("worksheet '{sheet_name}': {e}"),
        })?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    };
    let headers: Vec<String> = header_row.iter().map(header_text).collect();

    let body = rows
        .filter(|row| row.iter().any(|cell| !is_blank(cell)))
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(WideTable::new(headers, body).with_source(path))
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Header text as a spreadsheet loader would stringify it.
fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_numeric(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|value| value.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

/// Cell contents without coercion, except that integral floats become
/// integers (workbooks store every number as a float).
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => float_value(*f),
        Data::Int(i) => CellValue::Int(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::DateTime(_) => CellValue::Text(header_text(cell)),
        other => CellValue::Text(other.to_string()),
    }
}

fn float_value(value: f64) -> CellValue {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        CellValue::Int(value as i64)
    } else {
        CellValue::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_floats_become_ints() {
        assert_eq!(cell_value(&Data::Float(10.0)), CellValue::Int(10));
        assert_eq!(cell_value(&Data::Float(2.5)), CellValue::Float(2.5));
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Int(7));
    }

    #[test]
    fn test_strings_and_blanks() {
        assert_eq!(cell_value(&Data::String(String::new())), CellValue::Empty);
        assert_eq!(
            cell_value(&Data::String("内科".to_string())),
            CellValue::from("内科")
        );
        assert!(is_blank(&Data::String("  ".to_string())));
        assert!(!is_blank(&Data::Float(0.0)));
    }

    #[test]
    fn test_header_text() {
        assert_eq!(header_text(&Data::String(" 2024-01".to_string())), " 2024-01");
        assert_eq!(header_text(&Data::Float(2024.0)), "2024");
        assert_eq!(header_text(&Data::Empty), "");
    }

    #[test]
    fn test_missing_workbook() {
        let result = read_workbook_wide_table(Path::new("/no/such/book.xlsx"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
