//! Non-fatal findings returned alongside a successful transformation.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformWarning {
    /// Non-empty values in a date column that could not be parsed.
    DateCoercion { column: String, count: usize },
    /// Non-empty values in an amount column that are not numbers. They keep
    /// their original text.
    NumericCoercion { column: String, count: usize },
    /// An optional source column is absent; its output column is blank.
    OptionalColumnAbsent { source: String, output: String },
}

impl TransformWarning {
    /// Output column the warning refers to.
    pub fn column(&self) -> &str {
        match self {
            Self::DateCoercion { column, .. } | Self::NumericCoercion { column, .. } => column,
            Self::OptionalColumnAbsent { output, .. } => output,
        }
    }
}

impl fmt::Display for TransformWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateCoercion { column, count } => {
                write!(f, "{column}: {count} value(s) are not valid dates")
            }
            Self::NumericCoercion { column, count } => {
                write!(f, "{column}: {count} value(s) are not valid amounts")
            }
            Self::OptionalColumnAbsent { source, output } => {
                write!(f, "{output}: source column '{source}' not found, left blank")
            }
        }
    }
}
