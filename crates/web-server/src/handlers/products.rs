use crate::AppState;
use crate::handlers::Reply;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
};
use core_types::{NewProduct, Product, ProductWithCustomizations};
use database::DbError;
use std::sync::Arc;
use uuid::Uuid;

/// # POST /api/product
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewProduct>,
) -> Reply<Product> {
    let product = state.products.create(&payload).await?;
    Ok(ApiResponse::ok(product, "Product created"))
}

/// # GET /api/product
/// All products, each with its customizations.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Reply<Vec<ProductWithCustomizations>> {
    let products = state.products.get_all().await?;
    Ok(ApiResponse::ok(products, "Products fetched"))
}

/// # GET /api/product/:id
pub async fn get_product(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Reply<Product> {
    let product = state
        .products
        .get_by_id(id)
        .await?
        .ok_or_else(|| DbError::NotFound("product".to_string()))?;
    Ok(ApiResponse::ok(product, "Product fetched"))
}

/// # PUT /api/product/:id
pub async fn update_product(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewProduct>,
) -> Reply<Product> {
    let product = state.products.update(id, &payload).await?;
    Ok(ApiResponse::ok(product, "Product updated"))
}

/// # DELETE /api/product/:id
pub async fn delete_product(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Reply<()> {
    state.products.delete(id).await?;
    Ok(ApiResponse::ok((), "Product deleted"))
}
