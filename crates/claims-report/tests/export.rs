//! Export tests: build a workbook, then read it back.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use chrono::NaiveDate;
use claims_model::{CellValue, ClaimSummary, Row, Table, TotalsColumns};
use claims_report::{ExportError, ExportOptions, MIME_TYPE, TotalsRow, export};
use rust_decimal_macros::dec;

fn mapped_table() -> Table {
    let columns = ["No", "Claim No", "Payment Date", "Billed", "Accepted", "Excess Total", "Unpaid"]
        .map(String::from)
        .to_vec();
    let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    Table::with_rows(
        columns,
        vec![
            Row::new(
                1,
                vec![
                    CellValue::Integer(1),
                    CellValue::text("C-1"),
                    CellValue::Date(date),
                    CellValue::Number(dec!(1250.50)),
                    CellValue::Number(dec!(1000)),
                    CellValue::Number(dec!(250.50)),
                    CellValue::Number(dec!(0)),
                ],
            ),
            Row::new(
                4,
                vec![
                    CellValue::Integer(2),
                    CellValue::text("C-4"),
                    CellValue::NullDate,
                    CellValue::Missing,
                    CellValue::Number(dec!(10)),
                    CellValue::Number(dec!(0)),
                    CellValue::Number(dec!(5)),
                ],
            ),
        ],
    )
}

fn read_back(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).expect("open workbook");
    let range = workbook.worksheet_range(sheet).expect("worksheet");
    range.rows().map(<[Data]>::to_vec).collect()
}

#[test]
fn header_row_matches_table_columns() {
    let table = mapped_table();
    let exported = export(&table, &ExportOptions::default()).expect("export");
    assert_eq!(&exported.bytes[0..2], b"PK");
    assert_eq!(exported.filename, "Transformed_Claim_Data.xlsx");

    let rows = read_back(exported.bytes, "Benefit Claim");
    let header: Vec<String> = rows[0].iter().map(ToString::to_string).collect();
    assert_eq!(header, table.columns);
    assert_eq!(rows.len(), 3);
}

#[test]
fn cells_keep_their_types() {
    let exported = export(&mapped_table(), &ExportOptions::default()).expect("export");
    let rows = read_back(exported.bytes, "Benefit Claim");

    assert_eq!(rows[1][0], Data::Float(1.0));
    assert_eq!(rows[1][1], Data::String("C-1".to_string()));
    assert!(matches!(rows[1][2], Data::DateTime(_)));
    assert_eq!(rows[1][3], Data::Float(1250.5));
    assert_eq!(rows[2][2], Data::Empty);
    assert_eq!(rows[2][3], Data::Empty);
}

#[test]
fn custom_sheet_and_filename() {
    let options = ExportOptions::new("Claims March").with_filename("march");
    let exported = export(&mapped_table(), &options).expect("export");
    assert_eq!(exported.filename, "march.xlsx");
    let rows = read_back(exported.bytes, "Claims March");
    assert_eq!(rows.len(), 3);
}

#[test]
fn totals_footer_is_opt_in() {
    let summary = ClaimSummary {
        total_count: 2,
        total_billed: dec!(1250.50),
        total_accepted: dec!(1010),
        total_excess: dec!(250.50),
        total_unpaid: dec!(5),
    };
    let options = ExportOptions::default().with_totals(Some(TotalsRow {
        summary,
        columns: TotalsColumns::default(),
    }));
    let exported = export(&mapped_table(), &options).expect("export");
    let rows = read_back(exported.bytes, "Benefit Claim");

    assert_eq!(rows.len(), 5);
    assert!(rows[3].iter().all(|cell| *cell == Data::Empty));
    assert_eq!(rows[4][0], Data::String("Total".to_string()));
    assert_eq!(rows[4][3], Data::Float(1250.5));
    assert_eq!(rows[4][4], Data::Float(1010.0));
    assert_eq!(rows[4][6], Data::Float(5.0));
}

#[test]
fn header_only_table_exports() {
    let table = Table::new(vec!["No".to_string(), "Claim No".to_string()]);
    let exported = export(&table, &ExportOptions::default()).expect("export");
    let rows = read_back(exported.bytes, "Benefit Claim");
    assert_eq!(rows.len(), 1);
}

#[test]
fn invalid_sheet_name_is_rejected() {
    let error = export(&mapped_table(), &ExportOptions::new("a/b")).expect_err("bad name");
    assert!(matches!(error, ExportError::InvalidWorksheetName { .. }));
    insta::assert_snapshot!(error.to_string(), @r"invalid worksheet name 'a/b': worksheet name contains one of [ ] : * ? / \");
}

#[test]
fn mime_type_is_xlsx() {
    assert!(MIME_TYPE.ends_with("spreadsheetml.sheet"));
}
