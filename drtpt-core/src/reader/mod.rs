//! streaming readers for the simulation output files. every reader holds
//! a bounded byte window, decompresses `.gz` inputs transparently, skips and
//! counts malformed records, and fails fast on files it cannot open or decode.
mod delimited;
mod error;
mod pipeline;
mod population;
mod read_summary;
mod source;
mod stop_registry;
mod xml_ops;

pub use delimited::{DelimitedReader, DelimitedRecord, HeaderIndex};
pub use error::{ReaderError, RecordError};
pub use pipeline::{pipelined, PipelinedRecords};
pub use population::PopulationReader;
pub use read_summary::{ReadSummary, RecordStream};
pub use source::{is_gzip, open_source, RecordSource, READ_BUFFER_BYTES};
pub use stop_registry::StopRegistryReader;
