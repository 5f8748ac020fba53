//! Error types for the transformation stages.

use thiserror::Error;

use crate::filter::StatusDistribution;

/// Fatal transformation failures. No partial table accompanies these.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The status column is not in the input.
    #[error("status column '{column}' not found in input")]
    MissingColumn { column: String },

    /// One or more required source columns are absent.
    #[error("missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// No row carries the sentinel status.
    #[error(
        "no rows with {column} = '{sentinel}' ({} rows checked)",
        .distribution.total()
    )]
    EmptyResult {
        column: String,
        sentinel: String,
        distribution: StatusDistribution,
    },

    /// An amount total does not fit in a decimal.
    #[error("total of column '{column}' is too large")]
    TotalOverflow { column: String },
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;
