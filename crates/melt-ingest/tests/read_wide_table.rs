//! Integration tests for reading wide tables from disk.

use std::fs;

use melt_ingest::{IngestError, read_wide_table};
use melt_model::CellValue;
use tempfile::TempDir;

#[test]
fn reads_csv_by_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("出院人数.csv");
    fs::write(&path, "科室名称,2024-01,2024-02,合计\n内科,10,12,22\n").unwrap();

    let table = read_wide_table(&path).unwrap();

    assert_eq!(table.width(), 4);
    assert_eq!(table.rows[0][3], CellValue::Int(22));
}

#[test]
fn unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("table.txt");
    fs::write(&path, "科室名称\n内科\n").unwrap();

    let result = read_wide_table(&path);

    assert!(matches!(result, Err(IngestError::UnsupportedFormat { .. })));
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();

    let result = read_wide_table(&dir.path().join("missing.csv"));

    assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
}

#[test]
fn corrupt_workbook_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.xlsx");
    fs::write(&path, b"this is not a zip archive").unwrap();

    let result = read_wide_table(&path);

    assert!(matches!(result, Err(IngestError::Workbook { .. })));
}

#[test]
fn reads_first_worksheet_of_xlsx() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("科室出院.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "科室名称").unwrap();
    sheet.write_string(0, 1, "2024-01 ").unwrap();
    sheet.write_string(0, 2, "合计").unwrap();
    sheet.write_string(1, 0, "内科").unwrap();
    sheet.write_number(1, 1, 10.0).unwrap();
    sheet.write_number(1, 2, 10.5).unwrap();
    sheet.write_string(3, 0, "外科").unwrap();
    let other = workbook.add_worksheet();
    other.write_string(0, 0, "ignored").unwrap();
    workbook.save(&path).unwrap();

    let table = read_wide_table(&path).unwrap();

    assert_eq!(table.headers, vec!["科室名称", "2024-01 ", "合计"]);
    assert_eq!(table.height(), 2);
    assert_eq!(table.rows[0][1], CellValue::Int(10));
    assert_eq!(table.rows[0][2], CellValue::Float(10.5));
    assert_eq!(table.rows[1][0], CellValue::from("外科"));
    assert_eq!(table.rows[1][1], CellValue::Empty);
}
