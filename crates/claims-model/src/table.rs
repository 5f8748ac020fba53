//! In-memory claim table.
//!
//! A [`Table`] is an ordered list of column names plus ordered rows whose
//! cells line up with those columns. Stages never mutate a table they are
//! handed; they build and return a new one.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    /// Raw text as read from the source file.
    Text(String),
    /// Decimal amount, kept without rounding.
    Number(Decimal),
    /// Whole number (the `No` sequence column).
    Integer(i64),
    Date(NaiveDate),
    /// A date column value that could not be parsed.
    NullDate,
    Missing,
}

impl CellValue {
    /// Wrap raw text, mapping the empty string to [`CellValue::Missing`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Missing
        } else {
            Self::Text(value)
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Numeric view used by aggregation. Text is never parsed here.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Integer(value) => Some(Decimal::from(*value)),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// True for both `Missing` and `NullDate`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Missing | Self::NullDate)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Number(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Self::NullDate => f.write_str("NaT"),
            Self::Missing => Ok(()),
        }
    }
}

/// One record. `cells` is aligned with [`Table::columns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// 1-based data record number in the source file.
    pub record: u64,
    pub cells: Vec<CellValue>,
}

impl Row {
    pub fn new(record: u64, cells: Vec<CellValue>) -> Self {
        Self { record, cells }
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        debug_assert!(rows.iter().all(|row| row.cells.len() == columns.len()));
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Row) {
        debug_assert_eq!(row.cells.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate one column top to bottom, or `None` if the column is absent.
    pub fn column_values(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row.cells[index]))
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|row| row.get(index))
    }

    /// New table with the same columns and only the rows matching `keep`.
    pub fn filter_rows(&self, mut keep: impl FnMut(&Row) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    /// New table holding at most the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
