//! One handler module per entity. Every handler follows the same shape:
//! extract params, call the repository, wrap the result in the envelope.

pub mod admin;
pub mod customers;
pub mod customizations;
pub mod dashboard;
pub mod orders;
pub mod products;

use crate::error::AppError;
use crate::response::ApiResponse;
use axum::Json;
use serde_json::{Value, json};

/// # GET /health and /api/health
/// Liveness probe for load balancers and the mobile client's reachability
/// check.
pub async fn health() -> Json<Value> {
    Json(json!({ "message": "OK" }))
}

pub(crate) type Reply<T> = Result<Json<ApiResponse<T>>, AppError>;
