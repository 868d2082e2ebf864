use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::actor_framework::FrameworkError;
use crate::app_system::ConfigError;
use crate::contact_actor::ContactError;
use crate::file_store::FileStoreError;
use crate::inquiry_actor::InquiryError;
use crate::order_actor::OrderError;
use crate::project_actor::ProjectError;
use crate::user_actor::UserError;

/// Every failure a request can end in. Each variant maps to one status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Login required")]
    Unauthenticated,
    #[error("Admin privileges required")]
    Forbidden,
    #[error("Email already registered")]
    EmailAlreadyRegistered,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("File not found")]
    FileMissing,
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures that stop the process before or while serving.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    FileStore(#[from] FileStoreError),
    #[error("Invalid session secret: {0}")]
    SessionSecret(String),
    #[error("Record table unavailable: {0}")]
    RecordStore(#[from] FrameworkError),
    #[error("Bootstrap failed: {0}")]
    Bootstrap(#[from] AppError),
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),
    #[error("Actor task failed: {0}")]
    Shutdown(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::FileMissing => StatusCode::NOT_FOUND,
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::EmailAlreadyRegistered | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            AppError::Internal(detail) => {
                error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<FileStoreError> for AppError {
    fn from(e: FileStoreError) -> Self {
        match e {
            FileStoreError::InvalidName(_) | FileStoreError::DisallowedExtension(_) => {
                AppError::Validation(e.to_string())
            }
            FileStoreError::Io { .. } => AppError::Internal(e.to_string()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(_) => AppError::NotFound(e.to_string()),
            UserError::EmailAlreadyRegistered(_) => AppError::EmailAlreadyRegistered,
            UserError::InvalidCredentials => AppError::InvalidCredentials,
            UserError::Unauthenticated => AppError::Unauthenticated,
            UserError::Forbidden => AppError::Forbidden,
            UserError::ValidationError(msg) => AppError::Validation(msg),
            UserError::PasswordHashError(_) | UserError::ActorCommunicationError(_) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<ProjectError> for AppError {
    fn from(e: ProjectError) -> Self {
        match e {
            ProjectError::NotFound(_) => AppError::NotFound(e.to_string()),
            ProjectError::MissingFile => AppError::Validation(e.to_string()),
            ProjectError::ValidationError(msg) => AppError::Validation(msg),
            ProjectError::HasOrders { .. } => AppError::Conflict(e.to_string()),
            ProjectError::FileStore(inner) => inner.into(),
            ProjectError::ActorCommunicationError(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) | OrderError::ProjectNotFound(_) => AppError::NotFound(e.to_string()),
            OrderError::InvalidUser(_) => AppError::Unauthenticated,
            OrderError::FileMissing(_) => AppError::FileMissing,
            OrderError::FileStore(inner) => inner.into(),
            OrderError::ActorCommunicationError(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<ContactError> for AppError {
    fn from(e: ContactError) -> Self {
        match e {
            ContactError::ValidationError(msg) => AppError::Validation(msg),
            ContactError::ActorCommunicationError(_) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<InquiryError> for AppError {
    fn from(e: InquiryError) -> Self {
        match e {
            InquiryError::ProjectNotFound(_) => AppError::NotFound(e.to_string()),
            InquiryError::ValidationError(msg) => AppError::Validation(msg),
            InquiryError::ActorCommunicationError(_) => AppError::Internal(e.to_string()),
        }
    }
}
