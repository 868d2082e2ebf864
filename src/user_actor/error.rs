use thiserror::Error;

/// Errors that can occur during registration, login and session checks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(u64),
    #[error("Email already registered: {0}")]
    EmailAlreadyRegistered(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Login required")]
    Unauthenticated,
    #[error("Admin privileges required")]
    Forbidden,
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Password hashing error: {0}")]
    PasswordHashError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
