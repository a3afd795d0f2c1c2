//! Route tables, one module per resource, mounted under `/api`.

pub mod auth;
pub mod cart;
pub mod coupons;
pub mod health;
pub mod orders;
pub mod products;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use super::AppState;

pub fn api() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health))
        .nest("/auth", auth::routes())
        .nest("/products", products::routes())
        .nest("/cart", cart::routes())
        .nest("/coupons", coupons::routes())
        .nest("/orders", orders::routes())
}
