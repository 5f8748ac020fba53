use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use claims_cli::pipeline::{RunOptions, RunResult, run};
use claims_ingest::{DEFAULT_MAX_BYTES, DEFAULT_MAX_ROWS, IngestOptions};
use claims_model::{SchemaConfig, SchemaVariant, load_schema_file};
use claims_report::DEFAULT_FILENAME;

use crate::cli::TransformArgs;
use crate::summary::apply_table_style;

pub fn run_schemas() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Schema", "Status column", "Columns", "Description"]);
    apply_table_style(&mut table);
    for variant in SchemaVariant::ALL {
        let config = variant.config();
        table.add_row(vec![
            variant.to_string(),
            config.status_column.clone(),
            config.columns.len().to_string(),
            variant.description().to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_transform(args: &TransformArgs) -> Result<RunResult> {
    let mut schema = resolve_schema(args)?;
    if let Some(sheet_name) = &args.sheet_name {
        schema.worksheet_name.clone_from(sheet_name);
    }
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        args.input
            .parent()
            .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf)
    });
    let options = RunOptions {
        schema,
        ingest: ingest_options(args),
        output_dir,
        filename: args
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
        totals_row: args.totals_row,
        dry_run: args.dry_run,
        summary_json: args.summary_json.clone(),
    };
    info!(schema = %options.schema.name, dry_run = options.dry_run, "starting transform");
    run(&args.input, &options)
}

fn resolve_schema(args: &TransformArgs) -> Result<SchemaConfig> {
    match &args.schema_file {
        Some(path) => {
            load_schema_file(path).with_context(|| format!("load schema {}", path.display()))
        }
        None => Ok(SchemaVariant::from(args.schema).config()),
    }
}

fn ingest_options(args: &TransformArgs) -> IngestOptions {
    IngestOptions::default()
        .with_max_bytes(limit(args.max_bytes, DEFAULT_MAX_BYTES))
        .with_max_rows(limit(args.max_rows, DEFAULT_MAX_ROWS))
}

/// Zero disables a limit; no value keeps the default.
fn limit<T: Default + PartialEq>(value: Option<T>, default: T) -> Option<T> {
    match value {
        Some(value) if value == T::default() => None,
        Some(value) => Some(value),
        None => Some(default),
    }
}
