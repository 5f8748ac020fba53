//! Benefit claim workbook export.
//!
//! [`export`] turns a mapped claim table into the bytes of a single-sheet
//! XLSX workbook. Nothing is written to disk here.

pub mod error;
pub mod xlsx;

pub use error::{ExportError, Result};
pub use xlsx::{
    DEFAULT_FILENAME, ExportOptions, ExportedWorkbook, MIME_TYPE, TotalsRow, export,
    export_filename,
};
