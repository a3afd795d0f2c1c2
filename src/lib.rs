//! Storefront backend: catalog, carts, coupons and orders served over HTTP.
//!
//! Every record type lives in its own [`actor_framework::ResourceActor`].
//! Typed clients in [`clients`] wrap the actors and carry the cross-resource
//! workflows (cart stock checks, checkout). [`http`] exposes them as a JSON API.

pub mod actor_framework;
pub mod app_system;
pub mod auth;
pub mod cart_actor;
pub mod clients;
pub mod coupon_actor;
pub mod domain;
pub mod http;
pub mod order_actor;
pub mod product_actor;
pub mod user_actor;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
