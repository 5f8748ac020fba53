//! Benefit claim data model.
//!
//! - **table**: value-semantics [`Table`] of [`CellValue`]s
//! - **schema**: declarative [`SchemaConfig`] and the built-in [`SchemaVariant`]s
//! - **summary**: [`ClaimSummary`] totals

pub mod error;
pub mod schema;
pub mod summary;
pub mod table;

pub use error::{Result, SchemaError};
pub use schema::{
    ColumnMapping, DEFAULT_SENTINEL, DEFAULT_WORKSHEET_NAME, MAX_WORKSHEET_NAME_LEN,
    SEQUENCE_COLUMN, SchemaConfig, SchemaVariant, TotalsColumns, load_schema_file,
    worksheet_name_problem,
};
pub use summary::ClaimSummary;
pub use table::{CellValue, Row, Table};
