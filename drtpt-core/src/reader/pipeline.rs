use std::{
    path::PathBuf,
    sync::mpsc::{sync_channel, Receiver},
    thread::JoinHandle,
};

use super::{ReadSummary, ReaderError, RecordStream};

/// records decoded on a producer thread and handed over a bounded channel.
/// the producer blocks once `capacity` records are waiting, so memory stays
/// flat regardless of how far decoding runs ahead of classification.
pub struct PipelinedRecords<T> {
    receiver: Option<Receiver<Result<T, ReaderError>>>,
    producer: Option<JoinHandle<ReadSummary>>,
    path: PathBuf,
}

/// moves `stream` onto its own thread. the returned iterator yields the same
/// items in the same order as `stream` would have.
pub fn pipelined<T, S>(stream: S, capacity: usize) -> Result<PipelinedRecords<T>, ReaderError>
where
    T: Send + 'static,
    S: RecordStream<T> + Send + 'static,
{
    let path = PathBuf::from(&stream.summary().path);
    let (sender, receiver) = sync_channel(capacity.max(1));
    let producer = std::thread::Builder::new()
        .name(format!("reader-{}", path.display()))
        .spawn(move || {
            let mut stream = stream;
            for item in stream.by_ref() {
                if sender.send(item).is_err() {
                    // consumer hung up
                    break;
                }
            }
            stream.summary().clone()
        })
        .map_err(|e| ReaderError::Pipeline {
            path: path.clone(),
            message: format!("failure spawning reader thread: {e}"),
        })?;
    Ok(PipelinedRecords {
        receiver: Some(receiver),
        producer: Some(producer),
        path,
    })
}

impl<T> PipelinedRecords<T> {
    /// stops the producer and returns the read counts it accumulated.
    pub fn finish(mut self) -> Result<ReadSummary, ReaderError> {
        drop(self.receiver.take());
        let producer = self.producer.take().ok_or_else(|| ReaderError::Pipeline {
            path: self.path.clone(),
            message: String::from("reader thread already joined"),
        })?;
        producer.join().map_err(|_| ReaderError::Pipeline {
            path: self.path.clone(),
            message: String::from("reader thread panicked"),
        })
    }
}

impl<T> Iterator for PipelinedRecords<T> {
    type Item = Result<T, ReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.as_ref().and_then(|r| r.recv().ok())
    }
}
