use std::{
    collections::HashMap,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use csv::{StringRecord, StringRecordsIntoIter};

use super::{open_source, ReadSummary, ReaderError, RecordError, RecordSource, RecordStream};
use crate::model::{LegRecord, ModeTag, TripRecord};

/// column lookup built from the header row of a delimited log.
#[derive(Clone, Debug, Default)]
pub struct HeaderIndex(HashMap<String, usize>);

impl From<&StringRecord> for HeaderIndex {
    fn from(headers: &StringRecord) -> Self {
        let lookup = headers
            .iter()
            .enumerate()
            .map(|(idx, col)| (col.trim().trim_start_matches('\u{feff}').to_string(), idx))
            .collect();
        HeaderIndex(lookup)
    }
}

impl HeaderIndex {
    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    /// the trimmed value of a column on this row. None if the column is not in the
    /// header, the row is too short, or the value is empty.
    pub fn get<'r>(&self, row: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.0
            .get(column)
            .and_then(|idx| row.get(*idx))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// as [`HeaderIndex::get`] but a missing value makes the row malformed
    pub fn required<'r>(&self, row: &'r StringRecord, column: &str) -> Result<&'r str, RecordError> {
        self.get(row, column)
            .ok_or_else(|| RecordError::MissingField(column.to_string()))
    }
}

/// a record type that can be built from one row of a delimited log.
pub trait DelimitedRecord: Sized {
    /// columns that must appear in the header row
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// checks the header before any row is read. returns the name of the
    /// missing column on failure.
    fn validate_header(header: &HeaderIndex) -> Result<(), String> {
        match Self::REQUIRED_COLUMNS.iter().find(|c| !header.contains(c)) {
            Some(missing) => Err(missing.to_string()),
            None => Ok(()),
        }
    }

    fn from_row(header: &HeaderIndex, row: &StringRecord) -> Result<Self, RecordError>;
}

impl DelimitedRecord for LegRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["person", "trip_id", "mode"];

    fn from_row(header: &HeaderIndex, row: &StringRecord) -> Result<Self, RecordError> {
        let person_id = header.required(row, "person")?;
        let trip_id = header.required(row, "trip_id")?;
        let mode = header.required(row, "mode")?;
        Ok(LegRecord::new(person_id, trip_id, ModeTag::parse(mode)))
    }
}

impl DelimitedRecord for TripRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &["person", "trip_id", "modes"];

    fn validate_header(header: &HeaderIndex) -> Result<(), String> {
        if let Some(missing) = Self::REQUIRED_COLUMNS.iter().find(|c| !header.contains(c)) {
            return Err(missing.to_string());
        }
        if !header.contains("main_mode") && !header.contains("longest_distance_mode") {
            return Err(String::from("main_mode|longest_distance_mode"));
        }
        Ok(())
    }

    fn from_row(header: &HeaderIndex, row: &StringRecord) -> Result<Self, RecordError> {
        let person_id = header.required(row, "person")?.to_string();
        let trip_id = header.required(row, "trip_id")?.to_string();
        let primary_mode = header
            .get(row, "main_mode")
            .or_else(|| header.get(row, "longest_distance_mode"))
            .map(ModeTag::parse);
        let raw_mode_list = header
            .get(row, "modes")
            .map(TripRecord::parse_mode_list)
            .unwrap_or_default();
        Ok(TripRecord {
            person_id,
            trip_id,
            primary_mode,
            raw_mode_list,
        })
    }
}

/// streams typed records from a (optionally gzipped) delimited log with a
/// header row. rows that fail to build are skipped and counted.
pub struct DelimitedReader<T> {
    records: StringRecordsIntoIter<RecordSource>,
    header: HeaderIndex,
    path: PathBuf,
    summary: ReadSummary,
    failed: bool,
    record_type: PhantomData<T>,
}

impl<T: DelimitedRecord> DelimitedReader<T> {
    pub fn open(path: &Path, delimiter: u8) -> Result<Self, ReaderError> {
        let source = open_source(path)?;
        Self::from_source(source, path, delimiter)
    }

    pub fn from_source(
        source: RecordSource,
        path: &Path,
        delimiter: u8,
    ) -> Result<Self, ReaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(source);
        let headers = reader.headers().map_err(|e| ReaderError::Decode {
            path: path.to_path_buf(),
            message: format!("failure reading header row: {e}"),
        })?;
        let header = HeaderIndex::from(headers);
        T::validate_header(&header).map_err(|column| ReaderError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })?;
        Ok(Self {
            records: reader.into_records(),
            header,
            path: path.to_path_buf(),
            summary: ReadSummary::new(path),
            failed: false,
            record_type: PhantomData,
        })
    }
}

impl<T: DelimitedRecord> Iterator for DelimitedReader<T> {
    type Item = Result<T, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let row = match self.records.next()? {
                Ok(row) => row,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => {
                    // the container itself is broken, nothing after this point can be trusted
                    self.failed = true;
                    return Some(Err(ReaderError::Decode {
                        path: self.path.clone(),
                        message: e.to_string(),
                    }));
                }
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or_default();
                    self.summary
                        .add_malformed(&RecordError::Undecodable(e.to_string()), line);
                    continue;
                }
            };
            match T::from_row(&self.header, &row) {
                Ok(record) => {
                    self.summary.add_record();
                    return Some(Ok(record));
                }
                Err(e) => {
                    let line = row.position().map(|p| p.line()).unwrap_or_default();
                    self.summary.add_malformed(&e, line);
                }
            }
        }
    }
}

impl<T: DelimitedRecord> RecordStream<T> for DelimitedReader<T> {
    fn summary(&self) -> &ReadSummary {
        &self.summary
    }
}

#[cfg(test)]
mod test {
    use super::DelimitedReader;
    use crate::model::{LegRecord, ModeTag, TripRecord};
    use crate::reader::{ReaderError, RecordStream};
    use flate2::{write::GzEncoder, Compression};
    use std::{io::Write, path::Path};

    const LEGS: &str = "person;trip_id;dep_time;mode\n\
        1;1_1;08:00:00;drt_access\n\
        1;1_1;08:10:00;pt\n\
        1;1_1;08:40:00;drt_egress\n\
        2;2_1;09:00:00;car\n";

    fn write_plain(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).expect("test invariant failed: cannot write fixture");
        path
    }

    fn write_gz(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let file = std::fs::File::create(&path).expect("test invariant failed: cannot create fixture");
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(contents.as_bytes())
            .expect("test invariant failed: cannot write fixture");
        encoder.finish().expect("test invariant failed: cannot finish gzip");
        path
    }

    fn read_all(path: &Path) -> (Vec<LegRecord>, u64) {
        let mut reader = DelimitedReader::<LegRecord>::open(path, b';').expect("should open");
        let legs = reader
            .by_ref()
            .collect::<Result<Vec<_>, _>>()
            .expect("should not fail");
        (legs, reader.summary().malformed)
    }

    #[test]
    fn test_plain_and_gzip_are_identical() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let plain = write_plain(dir.path(), "output_legs.csv", LEGS);
        let gz = write_gz(dir.path(), "output_legs.csv.gz", LEGS);
        let (plain_legs, _) = read_all(&plain);
        let (gz_legs, _) = read_all(&gz);
        assert_eq!(plain_legs.len(), 4);
        assert_eq!(plain_legs, gz_legs);
        assert_eq!(plain_legs[0].mode, ModeTag::DrtAccess);
        assert_eq!(plain_legs[3].mode, ModeTag::Car);
    }

    #[test]
    fn test_row_missing_mode_is_skipped_and_counted() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let contents = "person;trip_id;mode\n1;1;walk\n1;2\n2;1;pt\n";
        let path = write_plain(dir.path(), "legs.csv", contents);
        let (legs, malformed) = read_all(&path);
        assert_eq!(legs.len(), 2);
        assert_eq!(malformed, 1);
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let path = write_plain(dir.path(), "legs.csv", "person;trip_id\n1;1\n");
        match DelimitedReader::<LegRecord>::open(&path, b';') {
            Err(ReaderError::MissingColumn { column, .. }) => assert_eq!(column, "mode"),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("expected missing column error"),
        }
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let result = DelimitedReader::<LegRecord>::open(Path::new("/no/such/legs.csv"), b';');
        assert!(matches!(result, Err(ReaderError::Open { .. })));
    }

    #[test]
    fn test_broken_gzip_is_fatal() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let path = write_plain(dir.path(), "legs.csv.gz", "this is not gzip");
        assert!(matches!(
            DelimitedReader::<LegRecord>::open(&path, b';'),
            Err(ReaderError::Decode { .. })
        ));
    }

    #[test]
    fn test_trip_rows_fall_back_to_longest_distance_mode() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let contents = "person;trip_id;longest_distance_mode;modes\n\
            1;1_1;pt;walk-drt_access-pt-walk\n\
            2;2_1;;walk\n";
        let path = write_plain(dir.path(), "trips.csv", contents);
        let mut reader = DelimitedReader::<TripRecord>::open(&path, b';').expect("should open");
        let trips = reader
            .by_ref()
            .collect::<Result<Vec<_>, _>>()
            .expect("should not fail");
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].primary_mode, Some(ModeTag::Pt));
        assert!(trips[0].has_drt_component());
        assert_eq!(trips[1].primary_mode, None);
        assert_eq!(reader.summary().records, 2);
    }

    #[test]
    fn test_trip_header_requires_a_primary_mode_column() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let path = write_plain(dir.path(), "trips.csv", "person;trip_id;modes\n1;1;walk\n");
        assert!(matches!(
            DelimitedReader::<TripRecord>::open(&path, b';'),
            Err(ReaderError::MissingColumn { .. })
        ));
    }
}
