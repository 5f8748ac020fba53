//! Error types for claim file ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a claim file.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the input file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Input Ceilings ===
    /// Input exceeds the configured byte ceiling.
    #[error("input is {size} bytes, above the {max_size} byte limit")]
    TooLarge { size: u64, max_size: u64 },

    /// Input exceeds the configured row ceiling.
    #[error("input has more than {max_rows} data rows")]
    TooManyRows { max_rows: usize },

    // === Parsing Errors ===
    /// Input starts with a byte-order mark for an encoding other than UTF-8.
    #[error("{encoding} input is not supported, save the file as UTF-8")]
    UnsupportedEncoding { encoding: &'static str },

    /// Malformed delimited text.
    #[error("failed to parse CSV{}: {message}", at_line(.line))]
    Parse { line: Option<u64>, message: String },
}

fn at_line(line: &Option<u64>) -> String {
    line.map(|line| format!(" at line {line}"))
        .unwrap_or_default()
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/path/to/claims.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /path/to/claims.csv");
    }

    #[test]
    fn test_parse_error_display() {
        let err = IngestError::Parse {
            line: Some(4),
            message: "expected 3 fields, found 2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse CSV at line 4: expected 3 fields, found 2"
        );
        let err = IngestError::Parse {
            line: None,
            message: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "failed to parse CSV: bad");
    }
}
