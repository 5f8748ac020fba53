//! Integration tests for the run pipeline.

use std::path::Path;

use claims_cli::pipeline::{RunOptions, run};
use claims_ingest::{IngestError, IngestOptions};
use claims_model::{SEQUENCE_COLUMN, SchemaVariant};
use claims_transform::TransformError;
use rust_decimal_macros::dec;

const SPACED_CSV: &str = "\
Client Name,Policy No,Claim No,Member No,Membership,Patient Name,Emp ID,Emp Name,Claim Type,\
Product Type,Room Option,Treatment Room Class,Treatment Place,Treatment Start,Treatment Finish,\
Diagnosis,Payment Date,Billed,Accepted,Excess Coy,Excess Emp,Excess Total,Unpaid,Status Claim
Acme,P-1,C-1,M-1,Employee,Jane Doe,E-1,Jane Doe,Inpatient,Health,VIP,VIP,General,2024-01-15,2024-01-18,Flu,2024-02-01,\"1,000.00\",900,50,50,100,0,R
Acme,P-1,C-2,M-2,Spouse,John Doe,E-1,Jane Doe,Outpatient,Health,-,-,Clinic,2024-01-20,2024-01-20,Cold,2024-02-03,200,200,0,0,0,0,P
Acme,P-2,C-3,M-3,Employee,Ann Lee,E-2,Ann Lee,Outpatient,Health,-,-,Clinic,2024-01-22,2024-01-22,Sprain,,250.50,200,25,25.50,50.50,0,R
";

fn write_input(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("claims.csv");
    std::fs::write(&path, contents).expect("write input");
    path
}

fn options(dir: &Path) -> RunOptions {
    RunOptions {
        schema: SchemaVariant::Spaced.config(),
        ingest: IngestOptions::default(),
        output_dir: dir.join("out"),
        filename: "March Claims".to_string(),
        totals_row: false,
        dry_run: false,
        summary_json: None,
    }
}

#[test]
fn writes_workbook_and_reports_totals() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), SPACED_CSV);

    let result = run(&input, &options(dir.path())).expect("run");

    assert_eq!(result.input_rows, 3);
    assert_eq!(result.output.summary.total_count, 2);
    assert_eq!(result.output.summary.total_billed, dec!(1250.50));
    assert_eq!(result.output.summary.total_excess, dec!(150.50));
    assert_eq!(result.output.table.columns[0], SEQUENCE_COLUMN);
    assert_eq!(result.workbook_name, "March Claims.xlsx");

    let path = result.workbook_path.expect("workbook path");
    assert_eq!(path, dir.path().join("out").join("March Claims.xlsx"));
    let bytes = std::fs::read(&path).expect("read workbook");
    assert_eq!(&bytes[0..2], b"PK");
    assert_eq!(bytes.len(), result.workbook_bytes);
}

#[test]
fn blank_payment_date_is_not_a_warning() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), SPACED_CSV);
    let result = run(&input, &options(dir.path())).expect("run");
    assert!(result.output.warnings.is_empty());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), SPACED_CSV);
    let mut options = options(dir.path());
    options.dry_run = true;

    let result = run(&input, &options).expect("run");

    assert!(result.workbook_path.is_none());
    assert!(result.workbook_bytes > 0);
    assert!(!dir.path().join("out").exists());
}

#[test]
fn summary_json_is_written() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), SPACED_CSV);
    let mut options = options(dir.path());
    options.summary_json = Some(dir.path().join("summary.json"));

    run(&input, &options).expect("run");

    let text = std::fs::read_to_string(dir.path().join("summary.json")).expect("read summary");
    let json: serde_json::Value = serde_json::from_str(&text).expect("parse summary");
    assert_eq!(json["schema"], "spaced");
    assert_eq!(json["summary"]["total_count"], 2);
    insta::assert_json_snapshot!(json["status_distribution"], @r#"
    {
      "counts": [
        {
          "count": 2,
          "value": "R"
        },
        {
          "count": 1,
          "value": "P"
        }
      ]
    }
    "#);
}

#[test]
fn empty_result_surfaces_transform_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), &SPACED_CSV.replace(",R\n", ",X\n"));

    let error = run(&input, &options(dir.path())).expect_err("empty result");

    match error.downcast_ref::<TransformError>() {
        Some(TransformError::EmptyResult { distribution, .. }) => {
            assert_eq!(distribution.count_of("X"), 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!dir.path().join("out").exists());
}

#[test]
fn wrong_layout_lists_missing_columns() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), SPACED_CSV);
    let mut options = options(dir.path());
    options.schema = SchemaVariant::Camel.config();

    let error = run(&input, &options).expect_err("wrong layout");
    let message = format!("{error:#}");
    assert!(message.starts_with("transform "));
    assert!(message.ends_with(": status column 'ClaimStatus' not found in input"));
}

#[test]
fn row_ceiling_stops_before_transform() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), SPACED_CSV);
    let mut options = options(dir.path());
    options.ingest = IngestOptions::default().with_max_rows(Some(1));

    let error = run(&input, &options).expect_err("too many rows");
    assert!(matches!(
        error.downcast_ref::<IngestError>(),
        Some(IngestError::TooManyRows { max_rows: 1 })
    ));
}
