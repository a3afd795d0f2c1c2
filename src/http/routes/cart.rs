use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::Router;
use serde::Deserialize;

use crate::domain::{CartRule, CartView};
use crate::http::{ApiError, ApiJson, ApiResponse, AppState, AuthUser};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_cart).post(add_to_cart).put(update_cart_item))
        .route("/{product_id}", delete(remove_from_cart))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineBody {
    product_id: Option<String>,
    quantity: Option<i64>,
}

async fn get_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<ApiResponse<CartView>, ApiError> {
    Ok(ApiResponse::ok(state.carts.get_cart(user.id).await?))
}

async fn add_to_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<CartLineBody>,
) -> Result<ApiResponse<CartView>, ApiError> {
    let (Some(product_id), Some(quantity)) = (body.product_id, body.quantity) else {
        return Err(ApiError::bad_request(CartRule::InvalidQuantity.message()));
    };
    let quantity = u32::try_from(quantity).map_err(|_| ApiError::bad_request(CartRule::InvalidQuantity.message()))?;
    let cart = state.carts.add_item(user.id, product_id, quantity).await?;
    Ok(ApiResponse::ok(cart))
}

async fn update_cart_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<CartLineBody>,
) -> Result<ApiResponse<CartView>, ApiError> {
    let (Some(product_id), Some(quantity)) = (body.product_id, body.quantity) else {
        return Err(ApiError::bad_request("Product ID and quantity required"));
    };
    let cart = state.carts.update_item(user.id, product_id, quantity).await?;
    Ok(ApiResponse::ok(cart))
}

async fn remove_from_cart(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<String>,
) -> Result<ApiResponse<CartView>, ApiError> {
    let cart = state.carts.remove_item(user.id, product_id).await?;
    Ok(ApiResponse::ok(cart))
}
