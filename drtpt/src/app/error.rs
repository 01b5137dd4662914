use std::path::PathBuf;

use drtpt_core::{reader::ReaderError, zone::ZoneError};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error(transparent)]
    Reader(#[from] ReaderError),
    #[error(transparent)]
    Zone(#[from] ZoneError),
    #[error("Failed writing output file '{path}': {message}")]
    Write { path: PathBuf, message: String },
}
