//! Schema mapping: required-column validation, coercion and projection.

use tracing::{debug, warn};

use claims_model::{CellValue, Row, SEQUENCE_COLUMN, SchemaConfig, Table};

use crate::error::{Result, TransformError};
use crate::normalization::{parse_amount, parse_date};
use crate::warning::TransformWarning;

/// Projected table plus the non-fatal findings produced while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedTable {
    pub table: Table,
    pub warnings: Vec<TransformWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coercion {
    None,
    Date,
    Amount,
}

/// How one output column is filled.
struct ColumnPlan<'a> {
    output: &'a str,
    source_index: Option<usize>,
    coercion: Coercion,
    failures: usize,
}

impl ColumnPlan<'_> {
    fn cell(&mut self, row: &Row) -> CellValue {
        let Some(index) = self.source_index else {
            return match self.coercion {
                Coercion::Date => CellValue::NullDate,
                Coercion::None | Coercion::Amount => CellValue::Missing,
            };
        };
        let value = &row.cells[index];
        match self.coercion {
            Coercion::None => value.clone(),
            Coercion::Date => self.coerce_date(value),
            Coercion::Amount => self.coerce_amount(value),
        }
    }

    fn coerce_date(&mut self, value: &CellValue) -> CellValue {
        match value {
            CellValue::Date(date) => CellValue::Date(*date),
            CellValue::Missing | CellValue::NullDate => CellValue::NullDate,
            CellValue::Text(text) if text.trim().is_empty() => CellValue::NullDate,
            other => {
                let parsed = match other {
                    CellValue::Text(text) => parse_date(text),
                    _ => parse_date(&other.to_string()),
                };
                parsed.map_or_else(
                    || {
                        self.failures += 1;
                        CellValue::NullDate
                    },
                    CellValue::Date,
                )
            }
        }
    }

    fn coerce_amount(&mut self, value: &CellValue) -> CellValue {
        match value {
            CellValue::Text(text) if text.trim().is_empty() => CellValue::Missing,
            CellValue::Text(text) => parse_amount(text).map_or_else(
                || {
                    self.failures += 1;
                    value.clone()
                },
                CellValue::Number,
            ),
            CellValue::NullDate => CellValue::Missing,
            other => other.clone(),
        }
    }

    fn warning(&self) -> Option<TransformWarning> {
        if self.failures == 0 {
            return None;
        }
        let column = self.output.to_string();
        let count = self.failures;
        match self.coercion {
            Coercion::Date => Some(TransformWarning::DateCoercion { column, count }),
            Coercion::Amount => Some(TransformWarning::NumericCoercion { column, count }),
            Coercion::None => None,
        }
    }
}

/// Validate `table` against `config` and project it onto the output layout.
///
/// Every required source column must exist, otherwise all absent names are
/// reported together in required order. The result starts with a `No`
/// column numbered 1..=n in input order, followed by the mapped columns in
/// schema order. Unmapped input columns are dropped.
pub fn map_to_schema(table: &Table, config: &SchemaConfig) -> Result<MappedTable> {
    let missing: Vec<String> = config
        .required_columns
        .iter()
        .filter(|column| !table.has_column(column))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(TransformError::MissingColumns { columns: missing });
    }

    let mut warnings = Vec::new();
    let mut plans: Vec<ColumnPlan<'_>> = config
        .columns
        .iter()
        .map(|mapping| {
            let source_index = table.column_index(&mapping.source);
            if source_index.is_none() {
                warnings.push(TransformWarning::OptionalColumnAbsent {
                    source: mapping.source.clone(),
                    output: mapping.output.clone(),
                });
            }
            let coercion = if config.is_date_column(&mapping.output) {
                Coercion::Date
            } else if config.is_numeric_column(&mapping.output) {
                Coercion::Amount
            } else {
                Coercion::None
            };
            ColumnPlan {
                output: &mapping.output,
                source_index,
                coercion,
                failures: 0,
            }
        })
        .collect();

    let mut columns = Vec::with_capacity(plans.len() + 1);
    columns.push(SEQUENCE_COLUMN.to_string());
    columns.extend(config.output_columns().map(str::to_string));

    let mut mapped = Table::new(columns);
    for (position, row) in table.rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(plans.len() + 1);
        cells.push(CellValue::Integer(position as i64 + 1));
        cells.extend(plans.iter_mut().map(|plan| plan.cell(row)));
        mapped.push_row(Row::new(row.record, cells));
    }

    warnings.extend(plans.iter().filter_map(ColumnPlan::warning));
    for warning in &warnings {
        warn!(column = warning.column(), "{warning}");
    }
    debug!(
        schema = %config.name,
        rows = mapped.height(),
        columns = mapped.width(),
        warnings = warnings.len(),
        "mapped to schema"
    );
    Ok(MappedTable {
        table: mapped,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use claims_model::{ColumnMapping, TotalsColumns};
    use rust_decimal_macros::dec;

    fn config() -> SchemaConfig {
        SchemaConfig {
            name: "test".to_string(),
            status_column: "Status".to_string(),
            status_sentinel: "R".to_string(),
            required_columns: vec!["Id".to_string(), "Paid".to_string(), "Amount".to_string()],
            date_columns: vec!["Payment Date".to_string()],
            numeric_columns: vec!["Billed".to_string()],
            columns: vec![
                ColumnMapping::new("Id", "Claim No"),
                ColumnMapping::new("Paid", "Payment Date"),
                ColumnMapping::new("Amount", "Billed"),
                ColumnMapping::new("Notes", "Diagnosis"),
            ],
            worksheet_name: "Benefit Claim".to_string(),
            totals: TotalsColumns {
                billed: "Billed".to_string(),
                accepted: "Billed".to_string(),
                excess: "Billed".to_string(),
                unpaid: "Billed".to_string(),
            },
        }
    }

    fn input(rows: &[[&str; 4]]) -> Table {
        Table::with_rows(
            ["Id", "Paid", "Amount", "Extra"].map(String::from).to_vec(),
            rows.iter()
                .enumerate()
                .map(|(i, row)| {
                    let cells = row.iter().map(|v| CellValue::text(*v)).collect();
                    Row::new(i as u64 + 7, cells)
                })
                .collect(),
        )
    }

    #[test]
    fn projects_with_sequence_column() {
        let table = input(&[["C-1", "2024-01-15", "100", "x"], ["C-2", "", "(5.50)", "y"]]);
        let mapped = map_to_schema(&table, &config()).unwrap();
        assert_eq!(
            mapped.table.columns,
            vec!["No", "Claim No", "Payment Date", "Billed", "Diagnosis"]
        );
        let first = &mapped.table.rows[0];
        assert_eq!(first.record, 7);
        assert_eq!(first.cells[0], CellValue::Integer(1));
        assert_eq!(
            first.cells[2],
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(first.cells[3], CellValue::Number(dec!(100)));
        assert_eq!(first.cells[4], CellValue::Missing);
        let second = &mapped.table.rows[1];
        assert_eq!(second.cells[0], CellValue::Integer(2));
        assert_eq!(second.cells[2], CellValue::NullDate);
        assert_eq!(second.cells[3], CellValue::Number(dec!(-5.50)));
    }

    #[test]
    fn absent_optional_source_warns() {
        let table = input(&[["C-1", "2024-01-15", "100", "x"]]);
        let mapped = map_to_schema(&table, &config()).unwrap();
        assert_eq!(
            mapped.warnings,
            vec![TransformWarning::OptionalColumnAbsent {
                source: "Notes".to_string(),
                output: "Diagnosis".to_string(),
            }]
        );
    }

    #[test]
    fn absent_optional_date_source_is_null_date() {
        let mut config = config();
        config.required_columns.retain(|column| column != "Paid");
        let table = Table::with_rows(
            vec!["Id".to_string(), "Amount".to_string()],
            vec![Row::new(1, vec![CellValue::text("C-1"), CellValue::text("10")])],
        );
        let mapped = map_to_schema(&table, &config).unwrap();
        assert_eq!(mapped.table.value(0, "Payment Date"), Some(&CellValue::NullDate));
        assert_eq!(mapped.table.value(0, "Diagnosis"), Some(&CellValue::Missing));
        assert!(mapped.warnings.contains(&TransformWarning::OptionalColumnAbsent {
            source: "Paid".to_string(),
            output: "Payment Date".to_string(),
        }));
    }

    #[test]
    fn bad_amount_keeps_text_and_warns_once() {
        let table = input(&[
            ["C-1", "2024-01-15", "n/a", "x"],
            ["C-2", "2024-01-16", "tbd", "x"],
            ["C-3", "2024-01-17", "", "x"],
        ]);
        let mapped = map_to_schema(&table, &config()).unwrap();
        assert_eq!(mapped.table.rows[0].cells[3], CellValue::text("n/a"));
        assert_eq!(mapped.table.rows[2].cells[3], CellValue::Missing);
        assert!(mapped.warnings.contains(&TransformWarning::NumericCoercion {
            column: "Billed".to_string(),
            count: 2,
        }));
    }
}
