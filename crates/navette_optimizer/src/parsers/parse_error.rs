use std::path::PathBuf;

use thiserror::Error;

/// Instance files that cannot be parsed fail here, before anything reaches
/// the optimization core.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("missing or malformed header line")]
    InvalidHeader,
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid time of day '{value}'")]
    InvalidTime { line: usize, value: String },
    #[error("line {line}: invalid number '{value}'")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: unknown direction label '{value}'")]
    InvalidDirection { line: usize, value: String },
}
