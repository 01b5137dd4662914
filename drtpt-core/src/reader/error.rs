use std::path::PathBuf;

/// failures that end a record stream. a file that cannot be opened or decoded
/// yields no trustworthy records, so these are never skipped.
#[derive(thiserror::Error, Debug)]
pub enum ReaderError {
    #[error("failure opening file '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure decoding '{path}': {message}")]
    Decode { path: PathBuf, message: String },
    #[error("file '{path}' is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
    #[error("malformed markup in '{path}': {message}")]
    Markup { path: PathBuf, message: String },
    #[error("record pipeline for '{path}' failed: {message}")]
    Pipeline { path: PathBuf, message: String },
}

/// reasons a single record is skipped. these are counted, never fatal.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("missing required field '{0}'")]
    MissingField(String),
    #[error("field '{field}' has non-numeric value '{value}'")]
    InvalidNumber { field: String, value: String },
    #[error("row could not be decoded: {0}")]
    Undecodable(String),
}
