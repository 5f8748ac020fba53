//! Status filter: keep only the rows whose status equals the sentinel.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use claims_model::{CellValue, Table};

use crate::error::{Result, TransformError};

/// Label used for empty status values in a [`StatusDistribution`].
pub const BLANK_STATUS: &str = "(blank)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub value: String,
    pub count: usize,
}

/// Every distinct status value seen before filtering, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusDistribution {
    pub counts: Vec<StatusCount>,
}

impl StatusDistribution {
    fn from_column<'a>(values: impl Iterator<Item = &'a CellValue>) -> Self {
        let mut tally: BTreeMap<String, usize> = BTreeMap::new();
        for value in values {
            *tally.entry(status_label(value)).or_default() += 1;
        }
        let mut counts: Vec<StatusCount> = tally
            .into_iter()
            .map(|(value, count)| StatusCount { value, count })
            .collect();
        // BTreeMap order already sorts ties by value; the sort is stable.
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        Self { counts }
    }

    /// Number of rows inspected.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|entry| entry.count).sum()
    }

    pub fn count_of(&self, value: &str) -> usize {
        self.counts
            .iter()
            .find(|entry| entry.value == value)
            .map_or(0, |entry| entry.count)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

fn status_label(value: &CellValue) -> String {
    match value {
        CellValue::Text(text) if !text.trim().is_empty() => text.clone(),
        CellValue::Text(_) | CellValue::Missing | CellValue::NullDate => BLANK_STATUS.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Rows whose status equals the sentinel, in input order.
    pub table: Table,
    pub distribution: StatusDistribution,
}

/// Keep the rows whose `column` value is exactly `sentinel`.
///
/// The match is case-sensitive with no trimming. An empty result is not an
/// error here.
pub fn filter_by_status(table: &Table, column: &str, sentinel: &str) -> Result<FilterOutcome> {
    let index = table
        .column_index(column)
        .ok_or_else(|| TransformError::MissingColumn {
            column: column.to_string(),
        })?;

    let statuses = table.rows.iter().map(|row| &row.cells[index]);
    let distribution = StatusDistribution::from_column(statuses);
    let filtered = table.filter_rows(|row| row.cells[index].as_text() == Some(sentinel));

    debug!(
        column,
        input_rows = table.height(),
        kept_rows = filtered.height(),
        distinct_statuses = distribution.counts.len(),
        "filtered by status"
    );
    Ok(FilterOutcome {
        table: filtered,
        distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims_model::Row;

    fn table(statuses: &[&str]) -> Table {
        let rows = statuses
            .iter()
            .enumerate()
            .map(|(i, s)| Row::new(i as u64 + 1, vec![CellValue::text(*s)]))
            .collect();
        Table::with_rows(vec!["ClaimStatus".to_string()], rows)
    }

    #[test]
    fn keeps_exact_matches_only() {
        let input = table(&["R", "r", " R", "P", "R", ""]);
        let outcome = filter_by_status(&input, "ClaimStatus", "R").unwrap();
        let records: Vec<u64> = outcome.table.rows.iter().map(|r| r.record).collect();
        assert_eq!(records, vec![1, 5]);
    }

    #[test]
    fn distribution_is_count_descending_then_by_value() {
        let input = table(&["P", "R", "X", "P", "", "R", "A"]);
        let outcome = filter_by_status(&input, "ClaimStatus", "R").unwrap();
        let labels: Vec<(&str, usize)> = outcome
            .distribution
            .counts
            .iter()
            .map(|c| (c.value.as_str(), c.count))
            .collect();
        assert_eq!(
            labels,
            vec![("P", 2), ("R", 2), ("(blank)", 1), ("A", 1), ("X", 1)]
        );
        assert_eq!(outcome.distribution.total(), 7);
        assert_eq!(outcome.distribution.count_of("R"), 2);
        assert_eq!(outcome.distribution.count_of("Z"), 0);
    }

    #[test]
    fn missing_status_column_is_an_error() {
        let input = table(&["R"]);
        let err = filter_by_status(&input, "Status Claim", "R").unwrap_err();
        assert!(
            matches!(err, TransformError::MissingColumn { column } if column == "Status Claim")
        );
    }

    #[test]
    fn no_match_returns_empty_table() {
        let input = table(&["P", "A"]);
        let outcome = filter_by_status(&input, "ClaimStatus", "R").unwrap();
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.table.columns, input.columns);
    }
}
