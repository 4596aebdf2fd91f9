//! CSV reading into wide tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use melt_model::{CellValue, WideTable};

use crate::error::{IngestError, Result};

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

fn open_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}

/// Reads a CSV file whose first record is the header row.
///
/// Headers are returned as written (apart from a UTF-8 BOM); trimming is left
/// to the reshape. Cells are typed with [`CellValue::infer`]. Rows made only
/// of blank cells are skipped.
pub fn read_csv_wide_table(path: &Path) -> Result<WideTable> {
    validate_encoding(path)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, &e))?;

    let mut records = reader.records();
    let Some(header_record) = records.next() else {
        return Err(IngestError::EmptyTable {
            path: path.to_path_buf(),
        });
    };
    let header_record = header_record.map_err(|e| csv_error(path, &e))?;
    let headers: Vec<String> = header_record
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            if idx == 0 {
                value.trim_start_matches('\u{feff}').to_string()
            } else {
                value.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| csv_error(path, &e))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(CellValue::infer).collect());
    }

    Ok(WideTable::new(headers, rows).with_source(path))
}

fn csv_error(path: &Path, error: &csv::Error) -> IngestError {
    if let csv::ErrorKind::Io(io) = error.kind()
        && io.kind() == std::io::ErrorKind::NotFound
    {
        return IngestError::FileNotFound {
            path: path.to_path_buf(),
        };
    }
    IngestError::CsvParse {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
