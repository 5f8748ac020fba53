//! Benefit claim transformation stages.
//!
//! - **filter**: keep rows whose status equals the sentinel
//! - **mapper**: validate required columns, coerce dates and amounts, project
//! - **summary**: count and amount totals
//! - **pipeline**: the three stages in order via [`transform`]

pub mod error;
pub mod filter;
pub mod mapper;
pub mod normalization;
pub mod pipeline;
pub mod summary;
pub mod warning;

pub use error::{Result, TransformError};
pub use filter::{BLANK_STATUS, FilterOutcome, StatusCount, StatusDistribution, filter_by_status};
pub use mapper::{MappedTable, map_to_schema};
pub use pipeline::{TransformOutput, TransformReport, transform};
pub use summary::summarize;
pub use warning::TransformWarning;
