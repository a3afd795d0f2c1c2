//! Per-user carts. The record id is the owning user's id.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use entity::CartCreate;
pub use error::*;
