//! Errors raised while decoding reading files.

use std::path::PathBuf;
use thiserror::Error;

/// Any failure here aborts the whole decode; bad rows are never skipped.
#[derive(Debug, Error)]
pub enum ReadingError {
    #[error("error opening {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: error reading CSV: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: error parsing timestamp {value:?}: {source}")]
    Timestamp {
        line: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("line {line}: error parsing {field} value {value:?}: {source}")]
    Number {
        line: usize,
        field: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    #[error("error decoding JSON readings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot tell input format of {}; use a .csv or .json extension or pass --format", .0.display())]
    UnknownFormat(PathBuf),
}
