use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;

use crate::domain::{Coupon, CouponCreate, CouponPatch, CouponSummary, DiscountQuote};
use crate::http::{AdminUser, ApiError, ApiJson, ApiResponse, AppState, AuthUser};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_coupon).get(list_coupons))
        .route("/validate", post(validate_coupon))
        .route("/active/list", get(active_coupons))
        .route("/{id}", put(update_coupon).delete(delete_coupon))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateBody {
    #[serde(default)]
    code: String,
    /// Overrides the server-side cart total when present.
    cart_total: Option<f64>,
}

async fn create_coupon(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(params): ApiJson<CouponCreate>,
) -> Result<ApiResponse<Coupon>, ApiError> {
    let coupon = state.coupons.create_coupon(params).await?;
    Ok(ApiResponse::created(coupon))
}

async fn list_coupons(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<ApiResponse<Vec<Coupon>>, ApiError> {
    Ok(ApiResponse::ok(state.coupons.list_coupons().await?))
}

async fn update_coupon(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<CouponPatch>,
) -> Result<ApiResponse<Coupon>, ApiError> {
    Ok(ApiResponse::ok(state.coupons.update_coupon(id, patch).await?))
}

async fn delete_coupon(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state.coupons.delete_coupon(id).await?;
    Ok(ApiResponse::done("Coupon deleted successfully"))
}

/// Prices a coupon against the caller's cart.
async fn validate_coupon(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(body): ApiJson<ValidateBody>,
) -> Result<ApiResponse<DiscountQuote>, ApiError> {
    if body.code.trim().is_empty() {
        return Err(ApiError::bad_request("Coupon code is required"));
    }
    let (cart_total, lines) = state.carts.coupon_basis(user.id).await?;
    let total = body.cart_total.filter(|total| total.is_finite() && *total >= 0.0).unwrap_or(cart_total);
    let quote = state.coupons.validate(body.code, total, &lines).await?;
    Ok(ApiResponse::ok(quote))
}

async fn active_coupons(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Vec<CouponSummary>>, ApiError> {
    Ok(ApiResponse::ok(state.coupons.active_coupons(Utc::now()).await?))
}
