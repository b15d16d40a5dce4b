use personbench_serialization::{ReadError, WriteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage engine error: {0}")]
    Storage(#[from] fjall::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read record: {0}")]
    Read(#[from] ReadError),
    #[error("failed to write record: {0}")]
    Write(#[from] WriteError),
    #[error("store already exists at {0}")]
    AlreadyExists(String),
    #[error("no store at {0}")]
    NotFound(String),
    #[error("credentials rejected for user '{0}'")]
    CredentialsRejected(String),
    #[error("invalid state: expected {expected}, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },
    #[error("entity class '{0}' is not registered")]
    UnregisteredEntity(&'static str),
    #[error("record {0} not found")]
    RecordNotFound(String),
    #[error("transaction conflict")]
    Conflict,
    #[error("internal error: {0}")]
    InternalError(String),
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::InternalError("failed to acquire read/write lock".into())
    }
}
