//! Error types for workbook export.

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// Excel would refuse the worksheet name.
    #[error("invalid worksheet name '{name}': {reason}")]
    InvalidWorksheetName { name: String, reason: &'static str },

    /// A cell value has no spreadsheet representation.
    #[error("cannot write {column} in row {row}: {message}")]
    Cell {
        row: u32,
        column: String,
        message: String,
    },

    /// Failure inside the workbook writer.
    #[error("failed to build workbook: {0}")]
    Workbook(String),
}

impl From<XlsxError> for ExportError {
    fn from(error: XlsxError) -> Self {
        Self::Workbook(error.to_string())
    }
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
