use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::CartRule;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart not found")]
    CartNotFound(String),
    #[error("Product not found")]
    ProductNotFound(String),
    #[error("{}", .0.message())]
    Rule(CartRule),
    #[error("{0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<CartRule> for CartError {
    fn from(rule: CartRule) -> Self {
        CartError::Rule(rule)
    }
}

impl From<FrameworkError> for CartError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => CartError::CartNotFound(id),
            FrameworkError::Rejected(reason) => CartError::ValidationError(reason),
            other => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}
