use thiserror::Error;
use crate::file_store::FileStoreError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProjectError {
    #[error("Project not found: {0}")]
    NotFound(u64),
    #[error("No project file selected")]
    MissingFile,
    #[error("Project validation error: {0}")]
    ValidationError(String),
    #[error("Project {id} has {orders} order(s) and cannot be deleted")]
    HasOrders { id: u64, orders: usize },
    #[error(transparent)]
    FileStore(#[from] FileStoreError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
