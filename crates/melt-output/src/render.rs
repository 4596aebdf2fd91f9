//! In-memory rendering of long tables.

use melt_model::{CellValue, LongTable};
use polars::prelude::{CsvWriter, SerWriter};
use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::frame::long_table_frame;

const UTF8_BOM: &[u8] = "\u{feff}".as_bytes();

/// Renders the table as CSV with a header row.
///
/// With `bom` set the output starts with a UTF-8 byte order mark, which
/// spreadsheet applications need to detect UTF-8 in CSV files.
pub fn render_csv(table: &LongTable, bom: bool) -> Result<Vec<u8>> {
    let mut df = long_table_frame(table)?;
    let mut buffer = Vec::new();
    if bom {
        buffer.extend_from_slice(UTF8_BOM);
    }
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut df)?;
    Ok(buffer)
}

/// Renders the table as an XLSX workbook with one worksheet.
pub fn render_xlsx(table: &LongTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in table.labels().headers().iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }

    for (idx, record) in table.records().iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_number(row, 0, record.sequence_number as f64)?;
        sheet.write_string(row, 1, &record.category)?;
        sheet.write_string(row, 2, &record.period_label)?;
        sheet.write_string(row, 3, &record.year)?;
        sheet.write_string(row, 4, &record.month_label)?;
        match &record.value {
            CellValue::Empty => {}
            CellValue::Int(v) => {
                sheet.write_number(row, 5, *v as f64)?;
            }
            CellValue::Float(v) => {
                sheet.write_number(row, 5, *v)?;
            }
            CellValue::Bool(v) => {
                sheet.write_boolean(row, 5, *v)?;
            }
            CellValue::Text(v) => {
                sheet.write_string(row, 5, v)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
