//! Typed handles over the resource actors.
//!
//! Single-resource clients are thin wrappers that translate framework errors
//! into domain errors. [`CartClient`] and [`OrderClient`] orchestrate several
//! actors, the way a root actor would.

#[macro_use]
mod macros;

pub mod cart_client;
pub mod coupon_client;
pub mod order_client;
pub mod product_client;
pub mod user_client;

pub use cart_client::*;
pub use coupon_client::*;
pub use order_client::*;
pub use product_client::*;
pub use user_client::*;

/// Newest-first ordering for listings; the actors hand records back oldest first.
pub(crate) fn newest_first<T>(mut items: Vec<T>) -> Vec<T> {
    items.reverse();
    items
}
