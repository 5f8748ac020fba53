//! Load → transform → export for a single claim file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{Level, debug, enabled, info, info_span, trace};

use claims_ingest::{IngestOptions, load_file};
use claims_model::{SchemaConfig, Table};
use claims_report::{ExportOptions, ExportedWorkbook, TotalsRow, export};
use claims_transform::{TransformOutput, transform};

use crate::logging::redact_value;

/// Columns worth tracing per exported row. Patient and employee names are
/// redacted unless row-level logging is enabled.
const TRACED_COLUMNS: [&str; 3] = ["Claim No", "Patient Name", "Emp Name"];

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub schema: SchemaConfig,
    pub ingest: IngestOptions,
    pub output_dir: PathBuf,
    pub filename: String,
    pub totals_row: bool,
    /// Build the workbook but do not write it.
    pub dry_run: bool,
    pub summary_json: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub schema_name: String,
    pub input_rows: usize,
    pub output: TransformOutput,
    pub workbook_name: String,
    pub workbook_bytes: usize,
    /// Where the workbook was written; `None` for dry runs.
    pub workbook_path: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
}

pub fn run(input: &Path, options: &RunOptions) -> Result<RunResult> {
    let span = info_span!("run", input = %input.display(), schema = %options.schema.name);
    let _guard = span.enter();

    let table = ingest(input, &options.ingest)?;
    let output = transform(&table, &options.schema)
        .with_context(|| format!("transform {}", input.display()))?;
    trace_rows(&output.table);

    let workbook = build_workbook(&output, options)?;
    let workbook_path = if options.dry_run {
        info!(filename = %workbook.filename, "dry run, workbook not written");
        None
    } else {
        Some(write_workbook(&workbook, &options.output_dir)?)
    };

    if let Some(path) = &options.summary_json {
        write_summary_json(&output, &options.schema, path)?;
    }

    Ok(RunResult {
        input: input.to_path_buf(),
        schema_name: options.schema.name.clone(),
        input_rows: table.height(),
        output,
        workbook_name: workbook.filename,
        workbook_bytes: workbook.bytes.len(),
        workbook_path,
        summary_json: options.summary_json.clone(),
    })
}

pub fn ingest(input: &Path, options: &IngestOptions) -> Result<Table> {
    let _stage = info_span!("ingest").entered();
    let table = load_file(input, options).with_context(|| format!("load {}", input.display()))?;
    info!(rows = table.height(), columns = table.width(), "loaded input");
    Ok(table)
}

pub fn build_workbook(output: &TransformOutput, options: &RunOptions) -> Result<ExportedWorkbook> {
    let _stage = info_span!("export").entered();
    let totals = options.totals_row.then(|| TotalsRow {
        summary: output.summary.clone(),
        columns: options.schema.totals.clone(),
    });
    let export_options = ExportOptions::new(options.schema.worksheet_name.clone())
        .with_filename(options.filename.clone())
        .with_totals(totals);
    export(&output.table, &export_options).context("build workbook")
}

fn write_workbook(workbook: &ExportedWorkbook, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;
    let path = output_dir.join(&workbook.filename);
    std::fs::write(&path, &workbook.bytes)
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), bytes = workbook.bytes.len(), "workbook written");
    Ok(path)
}

fn write_summary_json(output: &TransformOutput, schema: &SchemaConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&output.report(schema)).context("serialize summary")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "summary written");
    Ok(())
}

fn trace_rows(table: &Table) {
    if !enabled!(Level::TRACE) {
        return;
    }
    for row in &table.rows {
        let values: Vec<String> = TRACED_COLUMNS
            .iter()
            .filter_map(|column| table.column_index(column))
            .map(|index| redact_value(&row.cells[index].to_string()).to_string())
            .collect();
        trace!(record = row.record, values = ?values, "mapped row");
    }
}
