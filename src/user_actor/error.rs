use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found")]
    NotFound(String),
    #[error("User already exists")]
    AlreadyExists(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    ValidationError(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for UserError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            FrameworkError::AlreadyExists(email) => UserError::AlreadyExists(email),
            FrameworkError::Rejected(reason) => UserError::ValidationError(reason),
            other => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}
