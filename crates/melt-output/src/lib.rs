//! Output generation for reshaped long tables.
//!
//! - **CSV**: rendered from a Polars DataFrame, UTF-8 with BOM by default
//! - **XLSX**: a single `Sheet1` worksheet
//!
//! Files are rendered in memory and moved into place from a temporary file
//! in the destination directory, so a failed write never leaves a partial
//! output behind.

mod error;
mod frame;
mod render;
mod writer;

pub use error::{OutputError, Result};
pub use frame::{ValueKind, long_table_frame, value_kind};
pub use render::{render_csv, render_xlsx};
pub use writer::{OutputFormat, WriteOptions, resolve_output_path, write_long_table};
