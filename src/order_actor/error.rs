use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::OrderStatus;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found")]
    NotFound(String),
    #[error("Product \"{name}\" not found")]
    ProductNotFound { name: String },
    #[error("Insufficient stock for \"{name}\". Only {available} unit(s) available")]
    InsufficientStock { name: String, available: u32 },
    #[error("Price for \"{name}\" has changed. Please refresh your cart")]
    PriceChanged { name: String },
    #[error("Invalid status. Must be one of: {}", valid_statuses())]
    InvalidStatus(String),
    #[error("{0}")]
    Coupon(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

fn valid_statuses() -> String {
    OrderStatus::ALL
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Rejected(reason) => OrderError::ValidationError(reason),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
