//! Claim totals.

use rust_decimal::Decimal;

use claims_model::{CellValue, ClaimSummary, Table, TotalsColumns};

use crate::error::{Result, TransformError};

/// Row count and the four amount totals of a mapped table.
///
/// Only `Number` and `Integer` cells contribute; anything else counts as
/// zero, as does an absent column. A total beyond the decimal range is an
/// error.
pub fn summarize(table: &Table, totals: &TotalsColumns) -> Result<ClaimSummary> {
    Ok(ClaimSummary {
        total_count: table.height(),
        total_billed: column_total(table, &totals.billed)?,
        total_accepted: column_total(table, &totals.accepted)?,
        total_excess: column_total(table, &totals.excess)?,
        total_unpaid: column_total(table, &totals.unpaid)?,
    })
}

fn column_total(table: &Table, column: &str) -> Result<Decimal> {
    let Some(values) = table.column_values(column) else {
        return Ok(Decimal::ZERO);
    };
    values
        .filter_map(CellValue::as_decimal)
        .try_fold(Decimal::ZERO, |total, value| total.checked_add(value))
        .ok_or_else(|| TransformError::TotalOverflow {
            column: column.to_string(),
        })
}
