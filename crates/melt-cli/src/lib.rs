//! Library components of the `melt` batch converter.

pub mod batch;
pub mod config;
pub mod convert;
pub mod logging;
