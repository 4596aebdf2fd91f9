//! Output format selection and atomic file writes.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use melt_model::LongTable;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{OutputError, Result};
use crate::render::{render_csv, render_xlsx};

/// Output file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    /// `.csv` selects CSV; every other extension is written as XLSX.
    pub fn from_path(path: &Path) -> Self {
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv { Self::Csv } else { Self::Xlsx }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

/// Options for writing output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Prefix CSV output with a UTF-8 byte order mark.
    pub csv_bom: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { csv_bom: true }
    }
}

/// Joins `name` onto `dir`, fixing the extension to one that can be written.
///
/// `.csv` and `.xlsx` names are kept. Other workbook extensions (`.xls`,
/// `.xlsm`, `.xlsb`, `.ods`) are replaced with `.xlsx`, and any other name
/// gets `.xlsx` appended. `name` must be a single file name, so the result
/// always lies directly inside `dir`.
pub fn resolve_output_path(dir: &Path, name: &str) -> Result<PathBuf> {
    let mut components = Path::new(name).components();
    let is_file_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !is_file_name {
        return Err(OutputError::InvalidName {
            name: name.to_string(),
        });
    }

    let path = dir.join(name);
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    Ok(match ext.as_deref() {
        Some("csv" | "xlsx") => path,
        Some("xls" | "xlsm" | "xlsb" | "ods") => path.with_extension("xlsx"),
        _ => dir.join(format!("{name}.xlsx")),
    })
}

/// Writes `table` to `path` in the format implied by its extension.
///
/// The file is rendered in memory, written to a temporary file next to the
/// destination and then moved into place. Returns the written path.
pub fn write_long_table(table: &LongTable, path: &Path, options: WriteOptions) -> Result<PathBuf> {
    let format = OutputFormat::from_path(path);
    let bytes = match format {
        OutputFormat::Csv => render_csv(table, options.csv_bom)?,
        OutputFormat::Xlsx => render_xlsx(table)?,
    };
    write_atomic(path, &bytes)?;
    debug!(
        path = %path.display(),
        format = format.extension(),
        records = table.len(),
        bytes = bytes.len(),
        "wrote long table"
    );
    Ok(path.to_path_buf())
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let write_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(bytes).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|e| OutputError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
