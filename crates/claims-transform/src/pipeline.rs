//! Filter → map → summarize.

use serde::Serialize;
use tracing::{info, info_span};

use claims_model::{ClaimSummary, SchemaConfig, Table};

use crate::error::{Result, TransformError};
use crate::filter::{StatusDistribution, filter_by_status};
use crate::mapper::map_to_schema;
use crate::summary::summarize;
use crate::warning::TransformWarning;

/// Everything a successful run produces, ready for export and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub table: Table,
    pub summary: ClaimSummary,
    pub warnings: Vec<TransformWarning>,
    pub status_distribution: StatusDistribution,
}

/// Serializable run report (everything but the table itself).
#[derive(Debug, Serialize)]
pub struct TransformReport<'a> {
    pub schema: &'a str,
    pub summary: &'a ClaimSummary,
    pub status_distribution: &'a StatusDistribution,
    pub warnings: &'a [TransformWarning],
}

impl TransformOutput {
    pub fn report<'a>(&'a self, config: &'a SchemaConfig) -> TransformReport<'a> {
        TransformReport {
            schema: &config.name,
            summary: &self.summary,
            status_distribution: &self.status_distribution,
            warnings: &self.warnings,
        }
    }
}

/// Run the status filter, schema mapping and totals over a loaded table.
///
/// Stops with [`TransformError::EmptyResult`] when no row carries the
/// sentinel status.
pub fn transform(table: &Table, config: &SchemaConfig) -> Result<TransformOutput> {
    let span = info_span!("transform", schema = %config.name, rows = table.height());
    let _guard = span.enter();

    let filtered = {
        let _stage = info_span!("filter").entered();
        filter_by_status(table, &config.status_column, &config.status_sentinel)?
    };
    if filtered.table.is_empty() {
        return Err(TransformError::EmptyResult {
            column: config.status_column.clone(),
            sentinel: config.status_sentinel.clone(),
            distribution: filtered.distribution,
        });
    }

    let mapped = {
        let _stage = info_span!("map").entered();
        map_to_schema(&filtered.table, config)?
    };
    let summary = {
        let _stage = info_span!("summarize").entered();
        summarize(&mapped.table, &config.totals)?
    };

    info!(
        input_rows = table.height(),
        output_rows = summary.total_count,
        warnings = mapped.warnings.len(),
        "transform complete"
    );
    Ok(TransformOutput {
        table: mapped.table,
        summary,
        warnings: mapped.warnings,
        status_distribution: filtered.distribution,
    })
}
