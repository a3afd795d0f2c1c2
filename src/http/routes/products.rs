use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::Router;

use crate::domain::{Product, ProductCreate, ProductPatch, ProductQuery};
use crate::http::{AdminUser, ApiError, ApiJson, ApiQuery, ApiResponse, AppState};
use crate::product_actor::ProductError;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product).put(update_product).delete(delete_product))
}

async fn list_products(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    let products = state.products.list_products(query).await?;
    Ok(ApiResponse::list(products))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Product>, ApiError> {
    let product = state
        .products
        .get_product(id.clone())
        .await?
        .ok_or(ProductError::NotFound(id))?;
    Ok(ApiResponse::ok(product))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(params): ApiJson<ProductCreate>,
) -> Result<ApiResponse<Product>, ApiError> {
    let product = state.products.create_product(params).await?;
    Ok(ApiResponse::created(product).message("Product created successfully"))
}

async fn update_product(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<ApiResponse<Product>, ApiError> {
    let product = state.products.update_product(id, patch).await?;
    Ok(ApiResponse::ok(product).message("Product updated successfully"))
}

async fn delete_product(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state.products.delete_product(id).await?;
    Ok(ApiResponse::done("Product deleted successfully"))
}
