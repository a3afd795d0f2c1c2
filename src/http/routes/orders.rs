use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;

use crate::clients::PlaceOrder;
use crate::domain::{Order, OrderView};
use crate::http::{AdminUser, ApiError, ApiJson, ApiResponse, AppState, AuthUser};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(place_order).get(list_orders))
        .route("/user", get(user_orders))
        .route("/{id}/status", put(update_status))
        .route("/{id}/pay", put(mark_paid))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    #[serde(default)]
    status: String,
}

async fn place_order(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(form): ApiJson<PlaceOrder>,
) -> Result<ApiResponse<Order>, ApiError> {
    let order = state.orders.place_order(user.id, form).await?;
    Ok(ApiResponse::created(order).message("Order placed successfully"))
}

async fn user_orders(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<ApiResponse<Vec<OrderView>>, ApiError> {
    Ok(ApiResponse::list(state.orders.user_orders(user.id).await?))
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<ApiResponse<Vec<OrderView>>, ApiError> {
    Ok(ApiResponse::list(state.orders.list_orders().await?))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<ApiResponse<OrderView>, ApiError> {
    let order = state.orders.update_status(id, body.status).await?;
    let message = format!("Order status updated to {}", order.order.order_status);
    Ok(ApiResponse::ok(order).message(message))
}

async fn mark_paid(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<OrderView>, ApiError> {
    let order = state.orders.mark_paid(id).await?;
    Ok(ApiResponse::ok(order).message("Order marked as paid"))
}
