//! Wide table ingestion.
//!
//! This crate loads department-by-month source tables into a
//! [`melt_model::WideTable`].
//!
//! # Features
//!
//! - **CSV Loading**: first record is the header row, cell types are inferred
//! - **Workbook Loading**: `.xlsx`, `.xlsm`, `.xls` and `.ods` via calamine,
//!   first worksheet only
//! - **Input Discovery**: expand directories into supported files
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use melt_ingest::read_wide_table;
//!
//! let table = read_wide_table(Path::new("data/2024_discharges.xlsx"))?;
//! println!("{} departments", table.height());
//! ```

mod csv_table;
mod discovery;
mod error;
mod format;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Reading ===
pub use csv_table::read_csv_wide_table;
pub use format::{InputFormat, MAX_INPUT_FILE_SIZE, check_file_size, check_file_size_with_limit};
pub use workbook::read_workbook_wide_table;

// === File Discovery ===
pub use discovery::{expand_inputs, is_supported_input, list_input_files};

use std::path::Path;

use melt_model::WideTable;

/// Reads a wide table, choosing the reader from the file extension.
pub fn read_wide_table(path: &Path) -> Result<WideTable> {
    let format = InputFormat::from_path(path).ok_or_else(|| IngestError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    check_file_size(path)?;
    let table = match format {
        InputFormat::Csv => read_csv_wide_table(path)?,
        InputFormat::Workbook => read_workbook_wide_table(path)?,
    };
    tracing::debug!(
        path = %path.display(),
        columns = table.width(),
        rows = table.height(),
        "loaded wide table"
    );
    Ok(table)
}
