//! Durable list of maze records.
//!
//! The whole list lives in one JSON file that is rewritten on every append.
//! Appends go through a single writer task so rewrites land in order, and
//! callers never wait for the disk.

use crate::error_handling::StoreError;
use crate::types::{GridPoint, MazeId, START_POINT_COUNT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};

/// The layout facts a maze instance is rebuilt from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeRecord {
    pub maze_id: MazeId,
    pub start_points: [GridPoint; START_POINT_COUNT],
}

/// Outcome of a single append, delivered once the file has been rewritten.
pub type AppendResult = oneshot::Receiver<Result<(), StoreError>>;

enum WriterRequest {
    Append {
        record: MazeRecord,
        done: oneshot::Sender<Result<(), StoreError>>,
    },
    /// Answered once every earlier request has been handled.
    Flush(oneshot::Sender<()>),
}

/// Read the record file. Any failure is logged and yields no records.
pub async fn load(path: &Path) -> Vec<MazeRecord> {
    match read_records(path).await {
        Ok(records) => {
            log::info!("Loaded {} maze records from {}", records.len(), path.display());
            records
        }
        Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No record file at {}, starting without mazes", path.display());
            Vec::new()
        }
        Err(e) => {
            log::error!("Failed to load maze records from {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

async fn read_records(path: &Path) -> Result<Vec<MazeRecord>, StoreError> {
    let data = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&data)?)
}

async fn write_records(path: &Path, records: &[MazeRecord]) -> Result<(), StoreError> {
    let json = serde_json::to_vec(records)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Handle to the record writer task.
#[derive(Clone)]
pub struct RecordStore {
    sender: mpsc::UnboundedSender<WriterRequest>,
}

impl RecordStore {
    /// Start the writer task. `records` is the list already on disk; every
    /// append rewrites the file with it plus the new record.
    pub fn spawn(path: impl Into<PathBuf>, records: Vec<MazeRecord>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(path.into(), records, receiver));
        Self { sender }
    }

    /// Queue a record for persistence. The returned receiver reports the
    /// outcome and may be dropped.
    pub fn append(&self, record: MazeRecord) -> AppendResult {
        let (done, receiver) = oneshot::channel();
        if let Err(mpsc::error::SendError(request)) =
            self.sender.send(WriterRequest::Append { record, done })
        {
            if let WriterRequest::Append { record, done } = request {
                log::error!("Record writer is gone, maze {} was not persisted", record.maze_id);
                let _ = done.send(Err(StoreError::WriterClosed));
            }
        }
        receiver
    }

    /// Wait until every append queued so far has been written (or failed).
    pub async fn flush(&self) {
        let (done, receiver) = oneshot::channel();
        if self.sender.send(WriterRequest::Flush(done)).is_ok() {
            let _ = receiver.await;
        }
    }
}

async fn run_writer(
    path: PathBuf,
    mut records: Vec<MazeRecord>,
    mut requests: mpsc::UnboundedReceiver<WriterRequest>,
) {
    while let Some(request) = requests.recv().await {
        let (record, done) = match request {
            WriterRequest::Append { record, done } => (record, done),
            WriterRequest::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };

        let maze_id = record.maze_id;
        records.push(record);

        // In-memory state stays authoritative; the next successful write
        // brings the file back in line.
        let result = write_records(&path, &records).await;
        match &result {
            Ok(()) => log::debug!("Persisted maze {} ({} records)", maze_id, records.len()),
            Err(e) => log::error!("Failed to persist maze {}: {}", maze_id, e),
        }
        let _ = done.send(result);
    }
    log::debug!("Record writer for {} stopped", path.display());
}
