//! Data model for reshaping department-by-month tables.
//!
//! - **value**: opaque cell contents carried through the reshape untouched
//! - **table**: the wide input table and the long output table
//! - **period**: `YYYY-MM` period parsing and derived year/month labels
//! - **options**: reshape configuration and fixed output column labels
//! - **error**: reshape failures

pub mod error;
pub mod options;
pub mod period;
pub mod table;
pub mod value;

pub use error::{ReshapeError, Result};
pub use options::{OutputLabels, ReshapeConfig};
pub use period::Period;
pub use table::{LongRecord, LongTable, WideTable};
pub use value::{CellValue, format_numeric};
