use std::time::Duration;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("precondition failed: {0}")]
    Precondition(String),
    #[error("{nodes} nodes exceed the exhaustive search limit of {max}")]
    SizeLimitExceeded { nodes: usize, max: usize },
    #[error("no solution: there are no nodes to route")]
    NoSolution,
    #[error("solve cancelled after {evaluated} permutations ({:.2}s)", .elapsed.as_secs_f64())]
    Cancelled { evaluated: u64, elapsed: Duration },
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
