use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::CouponRejection;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CouponError {
    #[error("Coupon not found")]
    NotFound(String),
    #[error("Coupon code already exists")]
    AlreadyExists(String),
    #[error("{}", .0.message())]
    Rejected(CouponRejection),
    #[error("{0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<CouponRejection> for CouponError {
    fn from(rejection: CouponRejection) -> Self {
        CouponError::Rejected(rejection)
    }
}

impl From<FrameworkError> for CouponError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => CouponError::NotFound(id),
            FrameworkError::AlreadyExists(code) => CouponError::AlreadyExists(code),
            FrameworkError::Rejected(reason) => CouponError::ValidationError(reason),
            other => CouponError::ActorCommunicationError(other.to_string()),
        }
    }
}
