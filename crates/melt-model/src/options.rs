//! Configuration for reshaping.

use serde::{Deserialize, Serialize};

/// Header of the department-name column in source tables.
pub const DEFAULT_CATEGORY_COLUMN: &str = "科室名称";

/// Header of the row-total column dropped from source tables.
pub const DEFAULT_AGGREGATE_COLUMN: &str = "合计";

/// Column headers of the long output table, in output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputLabels {
    pub sequence: String,
    pub category: String,
    pub period: String,
    pub year: String,
    pub month: String,
    pub value: String,
}

impl Default for OutputLabels {
    fn default() -> Self {
        Self {
            sequence: "序号".to_string(),
            category: "科室".to_string(),
            period: "日期".to_string(),
            year: "年份".to_string(),
            month: "月份".to_string(),
            value: "出院人数".to_string(),
        }
    }
}

impl OutputLabels {
    /// The six output headers in fixed order.
    pub fn headers(&self) -> [&str; 6] {
        [
            self.sequence.as_str(),
            self.category.as_str(),
            self.period.as_str(),
            self.year.as_str(),
            self.month.as_str(),
            self.value.as_str(),
        ]
    }
}

/// Options controlling column classification and derived labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReshapeConfig {
    /// Header naming the category (department) column. Must be present.
    pub category_column: String,

    /// Header naming an aggregate column to drop. Need not be present.
    pub aggregate_column: Option<String>,

    /// Appended to the year number (`2024年`).
    pub year_suffix: String,

    /// Appended to the zero-padded month (`03月`).
    pub month_suffix: String,

    pub labels: OutputLabels,
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            category_column: DEFAULT_CATEGORY_COLUMN.to_string(),
            aggregate_column: Some(DEFAULT_AGGREGATE_COLUMN.to_string()),
            year_suffix: "年".to_string(),
            month_suffix: "月".to_string(),
            labels: OutputLabels::default(),
        }
    }
}

impl ReshapeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category_column(mut self, column: impl Into<String>) -> Self {
        self.category_column = column.into();
        self
    }

    #[must_use]
    pub fn with_aggregate_column(mut self, column: Option<String>) -> Self {
        self.aggregate_column = column;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: OutputLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Returns true if `header` (already trimmed) names the aggregate column.
    pub fn is_aggregate(&self, header: &str) -> bool {
        self.aggregate_column
            .as_deref()
            .is_some_and(|name| name.trim() == header)
    }

    /// Returns true if `header` (already trimmed) names the category column.
    pub fn is_category(&self, header: &str) -> bool {
        self.category_column.trim() == header
    }
}
