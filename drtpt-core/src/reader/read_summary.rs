use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ReaderError, RecordError};

/// counts of records produced and skipped while streaming one file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ReadSummary {
    pub path: String,
    pub records: u64,
    pub malformed: u64,
}

impl ReadSummary {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_string_lossy().to_string(),
            records: 0,
            malformed: 0,
        }
    }

    pub fn add_record(&mut self) {
        self.records += 1;
    }

    /// counts a skipped record. `location` is a line number or byte offset
    /// used only for the debug message.
    pub fn add_malformed(&mut self, error: &RecordError, location: u64) {
        self.malformed += 1;
        log::debug!("skipping record in '{}' near {location}: {error}", self.path);
    }
}

/// a lazy, non-restartable stream of typed records that tracks how many
/// records it produced and skipped. an `Err` item is fatal and ends the stream.
pub trait RecordStream<T>: Iterator<Item = Result<T, ReaderError>> {
    fn summary(&self) -> &ReadSummary;
}
