use crate::AppState;
use crate::handlers::Reply;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
};
use core_types::{Customization, NewCustomization, UpdateCustomization};
use database::DbError;
use std::sync::Arc;
use uuid::Uuid;

/// # POST /api/customizations
pub async fn create_customization(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCustomization>,
) -> Reply<Customization> {
    let customization = state.customizations.create(&payload).await?;
    Ok(ApiResponse::ok(customization, "Customization created"))
}

/// # GET /api/customizations
pub async fn list_customizations(
    State(state): State<Arc<AppState>>,
) -> Reply<Vec<Customization>> {
    let customizations = state.customizations.get_all().await?;
    Ok(ApiResponse::ok(customizations, "Customizations fetched"))
}

/// # GET /api/customizations/:id
pub async fn get_customization(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Reply<Customization> {
    let customization = state
        .customizations
        .get_by_id(id)
        .await?
        .ok_or_else(|| DbError::NotFound("customization".to_string()))?;
    Ok(ApiResponse::ok(customization, "Customization fetched"))
}

/// # PUT /api/customizations/:id
pub async fn update_customization(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateCustomization>,
) -> Reply<Customization> {
    let customization = state.customizations.update(id, &payload).await?;
    Ok(ApiResponse::ok(customization, "Customization updated"))
}

/// # DELETE /api/customizations/:id
/// Fails with a conflict when order items still reference the customization.
pub async fn delete_customization(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Reply<()> {
    state.customizations.delete(id).await?;
    Ok(ApiResponse::ok((), "Customization deleted"))
}
