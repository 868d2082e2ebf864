use thiserror::Error;
use crate::file_store::FileStoreError;

/// Errors that can occur during purchase and download.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(u64),
    #[error("Project not found: {0}")]
    ProjectNotFound(u64),
    #[error("Invalid user: {0}")]
    InvalidUser(u64),
    #[error("File not found: {0}")]
    FileMissing(String),
    #[error(transparent)]
    FileStore(#[from] FileStoreError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
