//! Wide-to-long reshaping of department-by-month tables.
//!
//! - **layout**: header trimming and column classification
//! - **reshape**: the melt, sort and derivation pipeline
//! - **observer**: optional structured progress events

pub mod layout;
pub mod observer;
pub mod reshape;

pub use layout::{ColumnLayout, PeriodColumn, classify_columns};
pub use observer::{
    CollectingObserver, NoopObserver, OwnedEvent, ReshapeEvent, ReshapeObserver, ReshapeStage,
    TracingObserver,
};
pub use reshape::{reshape, reshape_with_observer};
