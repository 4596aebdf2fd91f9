//! Structured progress events emitted while reshaping.
//!
//! Reshaping itself has no side effects. Callers that want per-category or
//! per-cell progress attach a [`ReshapeObserver`]; the engine calls it with
//! borrowed events as each stage runs.

use melt_model::CellValue;
use tracing::{debug, trace};

/// Pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReshapeStage {
    Classify,
    Melt,
    Finish,
}

/// A progress event borrowed from the running reshape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReshapeEvent<'a> {
    /// Headers were trimmed and classified.
    ColumnsClassified {
        category_column: &'a str,
        period_columns: usize,
        aggregate_dropped: bool,
    },
    /// A source row is about to be expanded.
    CategoryStarted { category: &'a str, row_index: usize },
    /// One (category, period, value) tuple was emitted.
    CellMelted {
        category: &'a str,
        period_label: &'a str,
        value: &'a CellValue,
    },
    /// The long table was built.
    Completed { records: usize, categories: usize },
}

impl ReshapeEvent<'_> {
    pub fn stage(&self) -> ReshapeStage {
        match self {
            Self::ColumnsClassified { .. } => ReshapeStage::Classify,
            Self::CategoryStarted { .. } | Self::CellMelted { .. } => ReshapeStage::Melt,
            Self::Completed { .. } => ReshapeStage::Finish,
        }
    }

    pub fn to_owned_event(&self) -> OwnedEvent {
        match *self {
            Self::ColumnsClassified {
                category_column,
                period_columns,
                aggregate_dropped,
            } => OwnedEvent::ColumnsClassified {
                category_column: category_column.to_string(),
                period_columns,
                aggregate_dropped,
            },
            Self::CategoryStarted {
                category,
                row_index,
            } => OwnedEvent::CategoryStarted {
                category: category.to_string(),
                row_index,
            },
            Self::CellMelted {
                category,
                period_label,
                value,
            } => OwnedEvent::CellMelted {
                category: category.to_string(),
                period_label: period_label.to_string(),
                value: value.clone(),
            },
            Self::Completed {
                records,
                categories,
            } => OwnedEvent::Completed {
                records,
                categories,
            },
        }
    }
}

/// Owned copy of a [`ReshapeEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedEvent {
    ColumnsClassified {
        category_column: String,
        period_columns: usize,
        aggregate_dropped: bool,
    },
    CategoryStarted {
        category: String,
        row_index: usize,
    },
    CellMelted {
        category: String,
        period_label: String,
        value: CellValue,
    },
    Completed {
        records: usize,
        categories: usize,
    },
}

/// Receives progress events from a reshape.
pub trait ReshapeObserver {
    fn on_event(&mut self, event: &ReshapeEvent<'_>);
}

/// Ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ReshapeObserver for NoopObserver {
    fn on_event(&mut self, _event: &ReshapeEvent<'_>) {}
}

/// Forwards events to `tracing`: categories at debug, cells at trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ReshapeObserver for TracingObserver {
    fn on_event(&mut self, event: &ReshapeEvent<'_>) {
        match *event {
            ReshapeEvent::ColumnsClassified {
                category_column,
                period_columns,
                aggregate_dropped,
            } => debug!(
                category_column,
                period_columns, aggregate_dropped, "columns classified"
            ),
            ReshapeEvent::CategoryStarted {
                category,
                row_index,
            } => debug!(category, row_index, "processing category"),
            ReshapeEvent::CellMelted {
                category,
                period_label,
                value,
            } => trace!(category, period = period_label, value = %value, "cell melted"),
            ReshapeEvent::Completed {
                records,
                categories,
            } => debug!(records, categories, "reshape complete"),
        }
    }
}

/// Keeps an owned copy of every event.
#[derive(Debug, Default, Clone)]
pub struct CollectingObserver {
    pub events: Vec<OwnedEvent>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReshapeObserver for CollectingObserver {
    fn on_event(&mut self, event: &ReshapeEvent<'_>) {
        self.events.push(event.to_owned_event());
    }
}
