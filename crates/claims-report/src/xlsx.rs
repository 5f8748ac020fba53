//! XLSX export of a mapped claim table.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{debug, info_span};

use claims_model::{
    CellValue, ClaimSummary, DEFAULT_WORKSHEET_NAME, Table, TotalsColumns, worksheet_name_problem,
};

use crate::error::{ExportError, Result};

/// Content type of the exported workbook.
pub const MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Download name used when the caller gives none.
pub const DEFAULT_FILENAME: &str = "Transformed_Claim_Data";

const TOTAL_LABEL: &str = "Total";
const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 40;

/// Summary row appended under the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalsRow {
    pub summary: ClaimSummary,
    pub columns: TotalsColumns,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub worksheet_name: String,
    /// Download name; `.xlsx` is appended when missing.
    pub filename: String,
    /// Footer with the claim totals. Off by default.
    pub totals: Option<TotalsRow>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            worksheet_name: DEFAULT_WORKSHEET_NAME.to_string(),
            filename: DEFAULT_FILENAME.to_string(),
            totals: None,
        }
    }
}

impl ExportOptions {
    pub fn new(worksheet_name: impl Into<String>) -> Self {
        Self {
            worksheet_name: worksheet_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    #[must_use]
    pub fn with_totals(mut self, totals: Option<TotalsRow>) -> Self {
        self.totals = totals;
        self
    }
}

/// Serialized workbook plus the name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedWorkbook {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// `name` with an `.xlsx` extension, or the default name when blank.
pub fn export_filename(name: &str) -> String {
    let name = name.trim();
    let name = if name.is_empty() {
        DEFAULT_FILENAME
    } else {
        name
    };
    if name.to_ascii_lowercase().ends_with(".xlsx") {
        name.to_string()
    } else {
        format!("{name}.xlsx")
    }
}

struct ExportFormats {
    header: Format,
    text: Format,
    integer: Format,
    amount: Format,
    date: Format,
    total_label: Format,
    total_amount: Format,
}

impl ExportFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_align(FormatAlign::Center)
                .set_background_color(0x4472C4)
                .set_font_color(0xFFFFFF)
                .set_border(FormatBorder::Thin),
            text: Format::new().set_border(FormatBorder::Thin),
            integer: Format::new()
                .set_num_format("0")
                .set_border(FormatBorder::Thin),
            amount: Format::new()
                .set_num_format("#,##0.00")
                .set_border(FormatBorder::Thin),
            date: Format::new()
                .set_num_format("yyyy-mm-dd")
                .set_border(FormatBorder::Thin),
            total_label: Format::new()
                .set_bold()
                .set_background_color(0xE2EFDA)
                .set_border(FormatBorder::Thin),
            total_amount: Format::new()
                .set_bold()
                .set_num_format("#,##0.00")
                .set_background_color(0xE2EFDA)
                .set_border(FormatBorder::Thin),
        }
    }
}

/// Write `table` to a single-sheet workbook.
///
/// Row 0 holds the column names; data follows in table order. Missing
/// values and unparsed dates are left blank.
pub fn export(table: &Table, options: &ExportOptions) -> Result<ExportedWorkbook> {
    let span = info_span!("export", rows = table.height(), sheet = %options.worksheet_name);
    let _guard = span.enter();

    if let Some(reason) = worksheet_name_problem(&options.worksheet_name) {
        return Err(ExportError::InvalidWorksheetName {
            name: options.worksheet_name.clone(),
            reason,
        });
    }

    let formats = ExportFormats::new();
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(&options.worksheet_name)?;

    for (col, name) in table.columns.iter().enumerate() {
        let col = column_number(col)?;
        sheet.write_string_with_format(0, col, name, &formats.header)?;
        sheet.set_column_width(col, column_width(table, name) as f64)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    let mut row_num: u32 = 0;
    for row in &table.rows {
        row_num += 1;
        for (col, value) in row.cells.iter().enumerate() {
            write_cell(sheet, row_num, col, value, &formats).map_err(|error| match error {
                ExportError::Cell { message, .. } => ExportError::Cell {
                    row: row_num,
                    column: table.columns[col].clone(),
                    message,
                },
                other => other,
            })?;
        }
    }

    if let Some(totals) = &options.totals {
        write_totals(sheet, table, row_num + 2, totals, &formats)?;
    }

    let bytes = workbook.save_to_buffer()?;
    let filename = export_filename(&options.filename);
    debug!(bytes = bytes.len(), filename = %filename, "workbook written");
    Ok(ExportedWorkbook { bytes, filename })
}

fn column_number(index: usize) -> Result<u16> {
    u16::try_from(index).map_err(|_| ExportError::Workbook(format!("too many columns: {index}")))
}

fn column_width(table: &Table, name: &str) -> usize {
    let longest = table
        .column_values(name)
        .map(|values| {
            values
                .take(200)
                .map(|value| value.to_string().chars().count())
                .max()
                .unwrap_or(0)
        })
        .unwrap_or(0);
    (longest.max(name.chars().count()) + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: usize,
    value: &CellValue,
    formats: &ExportFormats,
) -> Result<()> {
    let col = column_number(col)?;
    match value {
        CellValue::Text(text) => {
            sheet.write_string_with_format(row, col, text, &formats.text)?;
        }
        CellValue::Number(amount) => {
            sheet.write_number_with_format(row, col, decimal_to_f64(*amount)?, &formats.amount)?;
        }
        CellValue::Integer(number) => {
            sheet.write_number_with_format(row, col, *number as f64, &formats.integer)?;
        }
        CellValue::Date(date) => {
            sheet.write_datetime_with_format(row, col, &excel_date(*date)?, &formats.date)?;
        }
        CellValue::NullDate | CellValue::Missing => {
            sheet.write_blank(row, col, &formats.text)?;
        }
    }
    Ok(())
}

fn decimal_to_f64(value: Decimal) -> Result<f64> {
    value.to_f64().ok_or_else(|| ExportError::Cell {
        row: 0,
        column: String::new(),
        message: format!("amount {value} is out of range"),
    })
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime> {
    let invalid = || ExportError::Cell {
        row: 0,
        column: String::new(),
        message: format!("date {date} is outside the range Excel supports"),
    };
    let year = u16::try_from(date.year()).map_err(|_| invalid())?;
    // Month and day always fit.
    let month = date.month() as u8;
    let day = date.day() as u8;
    ExcelDateTime::from_ymd(year, month, day).map_err(|_| invalid())
}

fn write_totals(
    sheet: &mut Worksheet,
    table: &Table,
    row: u32,
    totals: &TotalsRow,
    formats: &ExportFormats,
) -> Result<()> {
    sheet.write_string_with_format(row, 0, TOTAL_LABEL, &formats.total_label)?;
    let sums = [
        (&totals.columns.billed, totals.summary.total_billed),
        (&totals.columns.accepted, totals.summary.total_accepted),
        (&totals.columns.excess, totals.summary.total_excess),
        (&totals.columns.unpaid, totals.summary.total_unpaid),
    ];
    for (column, amount) in sums {
        let Some(index) = table.column_index(column) else {
            continue;
        };
        sheet.write_number_with_format(
            row,
            column_number(index)?,
            decimal_to_f64(amount)?,
            &formats.total_amount,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_gets_extension_once() {
        assert_eq!(export_filename("claims"), "claims.xlsx");
        assert_eq!(export_filename("claims.XLSX"), "claims.XLSX");
        assert_eq!(export_filename("  "), "Transformed_Claim_Data.xlsx");
    }

    #[test]
    fn dates_before_1900_are_rejected() {
        let date = NaiveDate::from_ymd_opt(1850, 1, 1).unwrap();
        assert!(matches!(excel_date(date), Err(ExportError::Cell { .. })));
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert!(excel_date(date).is_ok());
    }
}
