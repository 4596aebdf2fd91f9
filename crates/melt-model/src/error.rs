use thiserror::Error;

/// Reasons a wide table cannot be reshaped.
///
/// Both variants abort the whole table; no partial output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReshapeError {
    /// The configured category header is not among the input headers.
    #[error("category column '{column}' not found in headers")]
    MissingCategoryColumn { column: String },

    /// A period header is not a `YYYY-MM` year-month.
    #[error("column {column_index} header '{label}' is not a YYYY-MM period")]
    PeriodParse { label: String, column_index: usize },
}

impl ReshapeError {
    /// Stable kind name used in batch reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCategoryColumn { .. } => "MissingCategoryColumn",
            Self::PeriodParse { .. } => "PeriodParseError",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReshapeError>;
