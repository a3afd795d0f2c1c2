use std::sync::Arc;

use crate::app_system::{Config, StoreSystem};
use crate::auth::JwtAuth;
use crate::clients::{CartClient, CouponClient, OrderClient, ProductClient, UserClient};

/// Shared handler state: the actor clients plus token settings.
pub struct AppState {
    pub users: UserClient,
    pub products: ProductClient,
    pub carts: CartClient,
    pub coupons: CouponClient,
    pub orders: OrderClient,
    pub jwt: JwtAuth,
}

impl AppState {
    pub fn new(system: &StoreSystem, config: &Config) -> Arc<Self> {
        let jwt = JwtAuth::new(
            config.jwt_secret.as_bytes(),
            chrono::Duration::hours(config.jwt_ttl_hours),
        );
        Arc::new(Self {
            users: system.user_client.clone(),
            products: system.product_client.clone(),
            carts: system.cart_client.clone(),
            coupons: system.coupon_client.clone(),
            orders: system.order_client.clone(),
            jwt,
        })
    }
}
