use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ContactError {
    #[error("Contact validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
