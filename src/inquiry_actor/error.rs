use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InquiryError {
    #[error("Project not found: {0}")]
    ProjectNotFound(u64),
    #[error("Inquiry validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
