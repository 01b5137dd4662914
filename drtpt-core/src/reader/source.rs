use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use flate2::read::MultiGzDecoder;

use super::ReaderError;

/// size of the raw byte window held by a reader at any time
pub const READ_BUFFER_BYTES: usize = 64 * 1024;

/// a buffered byte source that can be moved onto a producer thread
pub type RecordSource = Box<dyn BufRead + Send>;

/// true if the file extension marks a gzip container
pub fn is_gzip<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or_default()
}

/// opens a file for streaming, transparently decompressing `.gz` files.
/// only a bounded window of bytes is buffered; the file is never read whole.
pub fn open_source(path: &Path) -> Result<RecordSource, ReaderError> {
    let file = File::open(path).map_err(|source| ReaderError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let source: RecordSource = if is_gzip(path) {
        let decoder = MultiGzDecoder::new(BufReader::new(file));
        Box::new(BufReader::with_capacity(READ_BUFFER_BYTES, decoder))
    } else {
        Box::new(BufReader::with_capacity(READ_BUFFER_BYTES, file))
    };
    Ok(source)
}
