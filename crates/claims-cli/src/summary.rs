use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use rust_decimal::Decimal;

use claims_cli::pipeline::RunResult;
use claims_model::{CellValue, ClaimSummary};
use claims_transform::{BLANK_STATUS, StatusDistribution, TransformWarning};

const PREVIEW_ROWS: usize = 5;

pub fn print_summary(result: &RunResult) {
    println!("Input: {}", result.input.display());
    println!("Schema: {}", result.schema_name);
    match &result.workbook_path {
        Some(path) => println!("Workbook: {} ({} bytes)", path.display(), result.workbook_bytes),
        None => println!("Workbook: {} (dry run, not written)", result.workbook_name),
    }
    if let Some(path) = &result.summary_json {
        println!("Summary JSON: {}", path.display());
    }

    println!();
    println!(
        "Status distribution ({} rows read, {} kept):",
        result.input_rows, result.output.summary.total_count
    );
    print_status_distribution(&result.output.status_distribution);
    print_warnings(&result.output.warnings);
    print_preview(&result.output.table);
    print_totals(&result.output.summary);
}

pub fn print_status_distribution(distribution: &StatusDistribution) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Status"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in &distribution.counts {
        let status = if entry.value == BLANK_STATUS {
            dim_cell(&entry.value)
        } else {
            Cell::new(&entry.value)
        };
        table.add_row(vec![status, Cell::new(entry.count)]);
    }
    println!("{table}");
}

fn print_warnings(warnings: &[TransformWarning]) {
    if warnings.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Column"), header_cell("Warning")]);
    apply_table_style(&mut table);
    for warning in warnings {
        table.add_row(vec![
            Cell::new(warning.column()).fg(Color::Yellow),
            Cell::new(warning.to_string()),
        ]);
    }
    println!("Warnings:");
    println!("{table}");
}

fn print_preview(data: &claims_model::Table) {
    let preview = data.head(PREVIEW_ROWS);
    let mut table = Table::new();
    table.set_header(preview.columns.iter().map(|name| header_cell(name)));
    apply_preview_table_style(&mut table);
    for row in &preview.rows {
        table.add_row(row.cells.iter().map(value_cell));
    }
    println!("Preview (first {} of {} rows):", preview.height(), data.height());
    println!("{table}");
}

fn print_totals(summary: &ClaimSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Claims"),
        header_cell("Billed"),
        header_cell("Accepted"),
        header_cell("Excess"),
        header_cell("Unpaid"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(summary.total_count).add_attribute(Attribute::Bold),
        amount_cell(summary.total_billed),
        amount_cell(summary.total_accepted),
        amount_cell(summary.total_excess),
        amount_cell(summary.total_unpaid),
    ]);
    println!("{table}");
}

/// Two decimals with comma thousands separators.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{fraction}")
}

fn amount_cell(value: Decimal) -> Cell {
    let cell = Cell::new(format_amount(value)).add_attribute(Attribute::Bold);
    if value.is_sign_negative() && !value.is_zero() {
        cell.fg(Color::Red)
    } else {
        cell
    }
}

fn value_cell(value: &CellValue) -> Cell {
    match value {
        CellValue::Number(amount) => {
            Cell::new(format_amount(*amount)).set_alignment(CellAlignment::Right)
        }
        CellValue::Integer(number) => Cell::new(number).set_alignment(CellAlignment::Right),
        CellValue::NullDate | CellValue::Missing => dim_cell(value),
        CellValue::Text(_) | CellValue::Date(_) => Cell::new(value),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_preview_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
