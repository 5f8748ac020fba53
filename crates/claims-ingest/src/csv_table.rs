//! CSV loading into a claim [`Table`].

use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, debug_span, warn};

use claims_model::{CellValue, Row, Table};

use crate::error::{IngestError, Result};

/// Default byte ceiling for a single upload (50 MB).
pub const DEFAULT_MAX_BYTES: u64 = 50 * 1024 * 1024;

/// Default data-row ceiling for a single upload.
pub const DEFAULT_MAX_ROWS: usize = 1_000_000;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Input ceilings applied while loading. `None` disables a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub max_bytes: Option<u64>,
    pub max_rows: Option<usize>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_bytes: Some(DEFAULT_MAX_BYTES),
            max_rows: Some(DEFAULT_MAX_ROWS),
        }
    }
}

impl IngestOptions {
    pub fn unlimited() -> Self {
        Self {
            max_bytes: None,
            max_rows: None,
        }
    }

    #[must_use]
    pub fn with_max_bytes(mut self, max_bytes: Option<u64>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use]
    pub fn with_max_rows(mut self, max_rows: Option<usize>) -> Self {
        self.max_rows = max_rows;
        self
    }
}

fn normalize_header(raw: &str, index: usize) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let normalized = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        format!("Unnamed: {index}")
    } else {
        normalized
    }
}

fn check_size(size: u64, options: &IngestOptions) -> Result<()> {
    match options.max_bytes {
        Some(max_size) if size > max_size => Err(IngestError::TooLarge { size, max_size }),
        _ => Ok(()),
    }
}

/// Reject byte-order marks for encodings the loader cannot read.
fn check_encoding(bytes: &[u8]) -> Result<()> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        });
    }
    Ok(())
}

fn parse_error(error: &csv::Error) -> IngestError {
    let line = error.position().map(csv::Position::line);
    let message = match error.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} fields, found {len}"),
        csv::ErrorKind::Utf8 { err, .. } => format!("invalid UTF-8: {err}"),
        _ => error.to_string(),
    };
    IngestError::Parse { line, message }
}

/// Parse comma-separated bytes into a [`Table`].
///
/// The first record is the header. Header names are trimmed and inner
/// whitespace collapsed; cell values are kept verbatim, with empty fields
/// loaded as [`CellValue::Missing`]. A header-only input yields a zero-row
/// table.
pub fn load(bytes: &[u8], options: &IngestOptions) -> Result<Table> {
    let span = debug_span!("load", bytes = bytes.len());
    let _guard = span.enter();

    check_size(bytes.len() as u64, options)?;
    check_encoding(bytes)?;
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| parse_error(&error))?
        .iter()
        .enumerate()
        .map(|(index, name)| normalize_header(name, index))
        .collect();

    if headers.len() > 500 {
        warn!(
            columns = headers.len(),
            "input has more than 500 columns - may impact performance"
        );
    }

    let mut table = Table::new(headers);
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|error| parse_error(&error))?;
        if let Some(max_rows) = options.max_rows
            && idx >= max_rows
        {
            return Err(IngestError::TooManyRows { max_rows });
        }
        let cells = record.iter().map(CellValue::text).collect();
        table.push_row(Row::new(idx as u64 + 1, cells));
    }

    debug!(
        rows = table.height(),
        columns = table.width(),
        "loaded claim table"
    );
    Ok(table)
}

/// Read a claim file from disk, checking its size before reading it.
pub fn load_file(path: &Path, options: &IngestOptions) -> Result<Table> {
    let metadata = std::fs::metadata(path).map_err(|e| read_error(path, e))?;
    check_size(metadata.len(), options)?;
    let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
    load(&bytes, options)
}

fn read_error(path: &Path, error: std::io::Error) -> IngestError {
    if error.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: error,
        }
    }
}
