use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use drtpt_core::{
    reader::is_gzip,
    report::{AnalysisReport, StopOutputRow},
    stop::StopClassification,
};
use flate2::{write::GzEncoder, Compression};

use super::AppError;

/// writes one CSV row per stop in registry order. a `.gz` path is written
/// gzip-compressed. returns the number of rows written.
pub fn write_stop_csv(path: &Path, stops: &[StopClassification]) -> Result<usize, AppError> {
    let file = File::create(path).map_err(|e| write_error(path, e))?;
    if is_gzip(path) {
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        let encoder = write_rows(path, encoder, stops)?;
        let mut inner = encoder.finish().map_err(|e| write_error(path, e))?;
        inner.flush().map_err(|e| write_error(path, e))?;
    } else {
        let mut inner = write_rows(path, BufWriter::new(file), stops)?;
        inner.flush().map_err(|e| write_error(path, e))?;
    }
    log::info!("wrote {} stop rows to '{}'", stops.len(), path.display());
    Ok(stops.len())
}

/// writes the full report as pretty-printed JSON
pub fn write_summary(path: &Path, report: &AnalysisReport) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(report).map_err(|e| AppError::Write {
        path: path.to_path_buf(),
        message: format!("failure serializing report: {e}"),
    })?;
    std::fs::write(path, json).map_err(|e| write_error(path, e))?;
    log::info!("wrote analysis summary to '{}'", path.display());
    Ok(())
}

fn write_rows<W: Write>(path: &Path, sink: W, stops: &[StopClassification]) -> Result<W, AppError> {
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(sink);
    for stop in stops.iter() {
        writer
            .serialize(StopOutputRow::from(stop))
            .map_err(|e| write_error(path, e))?;
    }
    writer.into_inner().map_err(|e| AppError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_error<E: ToString>(path: &Path, e: E) -> AppError {
    AppError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::write_stop_csv;
    use drtpt_core::stop::StopClassification;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn stops() -> Vec<StopClassification> {
        vec![
            StopClassification {
                stop_id: String::from("a"),
                name: Some(String::from("Main, First")),
                x: 100.0,
                y: 200.0,
                category: Some(String::from("2")),
                inside_zone: true,
                within_radius: true,
                distance_to_zone: 0.0,
            },
            StopClassification {
                stop_id: String::from("b"),
                name: None,
                x: 13000.0,
                y: 5000.0,
                category: None,
                inside_zone: false,
                within_radius: false,
                distance_to_zone: f64::NAN,
            },
        ]
    }

    const EXPECTED: &str = "stop_id,name,x,y,category,inside_drt_area,within_intermodal_radius,distance_to_drt_m\n\
        a,\"Main, First\",100.0,200.0,2,true,true,0.0\n\
        b,N/A,13000.0,5000.0,,false,false,\n";

    #[test]
    fn test_plain_csv() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let path = dir.path().join("stops.csv");
        let n = write_stop_csv(&path, &stops()).expect("should write");
        assert_eq!(n, 2);
        let written = std::fs::read_to_string(&path).expect("should read back");
        assert_eq!(written, EXPECTED);
    }

    #[test]
    fn test_gzip_csv() {
        let dir = tempfile::tempdir().expect("test invariant failed: no tempdir");
        let path = dir.path().join("stops.csv.gz");
        write_stop_csv(&path, &stops()).expect("should write");
        let file = std::fs::File::open(&path).expect("should open");
        let mut written = String::new();
        GzDecoder::new(file)
            .read_to_string(&mut written)
            .expect("should decompress");
        assert_eq!(written, EXPECTED);
    }
}
