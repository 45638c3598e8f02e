// error_handling.rs - Error types for the coordinator and the record store

use crate::types::MazeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("maze generation failed: {0}")]
    Generator(#[from] maze_generator::GeneratorError),

    #[error("unknown maze {maze_id}")]
    UnknownMaze { maze_id: MazeId },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("record file is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record writer has stopped")]
    WriterClosed,
}

pub type Result<T> = std::result::Result<T, CoordinatorError>;
