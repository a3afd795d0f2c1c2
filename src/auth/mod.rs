//! Bearer-token authentication and password hashing.

pub mod jwt;
pub mod password;

pub use jwt::*;
pub use password::*;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    #[error("Not authorized, no token")]
    MissingToken,
    #[error("Not authorized, token failed")]
    InvalidToken(String),
    #[error("Not authorized as admin")]
    NotAdmin,
    #[error("Token encoding failed: {0}")]
    Encoding(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}
