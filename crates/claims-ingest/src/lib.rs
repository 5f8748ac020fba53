//! Benefit claim file ingestion.
//!
//! Reads comma-separated claim exports into a [`claims_model::Table`],
//! enforcing byte and row ceilings before any transformation runs.

pub mod csv_table;
pub mod error;

pub use csv_table::{DEFAULT_MAX_BYTES, DEFAULT_MAX_ROWS, IngestOptions, load, load_file};
pub use error::{IngestError, Result};
