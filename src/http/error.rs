use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::AuthError;
use crate::cart_actor::CartError;
use crate::coupon_actor::CouponError;
use crate::domain::CartRule;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;

/// Any failure a handler can return, rendered as `{ success: false, message }`.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Hides the detail from the caller; it is logged when the response is built.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            error!(status = %self.status, detail = %self.message, "Request failed");
            "Server error".to_string()
        } else {
            warn!(status = %self.status, message = %self.message, "Request rejected");
            self.message
        };
        (self.status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) => ApiError::bad_request("Invalid JSON payload"),
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::bad_request("Expected a JSON body with Content-Type: application/json")
            }
            other => ApiError::bad_request(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match err {
            AuthError::MissingToken | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::NotAdmin => StatusCode::FORBIDDEN,
            AuthError::Encoding(_) | AuthError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        let status = match err {
            UserError::NotFound(_) => StatusCode::NOT_FOUND,
            UserError::AlreadyExists(_) | UserError::ValidationError(_) => StatusCode::BAD_REQUEST,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::Hashing(_) | UserError::ActorCommunicationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        let status = match err {
            ProductError::NotFound(_) => StatusCode::NOT_FOUND,
            ProductError::InsufficientStock { .. } | ProductError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            ProductError::ActorCommunicationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        let status = match err {
            CartError::CartNotFound(_)
            | CartError::ProductNotFound(_)
            | CartError::Rule(CartRule::ItemMissing) => StatusCode::NOT_FOUND,
            CartError::Rule(_) | CartError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CartError::ActorCommunicationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<CouponError> for ApiError {
    fn from(err: CouponError) -> Self {
        let status = match err {
            CouponError::NotFound(_) => StatusCode::NOT_FOUND,
            CouponError::AlreadyExists(_)
            | CouponError::Rejected(_)
            | CouponError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CouponError::ActorCommunicationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        let status = match err {
            OrderError::NotFound(_) | OrderError::ProductNotFound { .. } => StatusCode::NOT_FOUND,
            OrderError::InsufficientStock { .. }
            | OrderError::PriceChanged { .. }
            | OrderError::InvalidStatus(_)
            | OrderError::Coupon(_)
            | OrderError::ValidationError(_) => StatusCode::BAD_REQUEST,
            OrderError::ActorCommunicationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err.to_string())
    }
}
