//! Discount coupons: unique codes, date windows and usage counters.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
