use crate::AppState;
use crate::handlers::Reply;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
};
use core_types::{Customer, CustomerWithOrders, NewCustomer, UpdateCustomer};
use database::DbError;
use std::sync::Arc;
use uuid::Uuid;

/// # POST /api/customer
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewCustomer>,
) -> Reply<Customer> {
    let customer = state.customers.create(&payload).await?;
    Ok(ApiResponse::ok(customer, "Customer created"))
}

/// # GET /api/customer
/// All customers, each with its full order list.
pub async fn list_customers(State(state): State<Arc<AppState>>) -> Reply<Vec<CustomerWithOrders>> {
    let customers = state.customers.get_all().await?;
    Ok(ApiResponse::ok(customers, "Customers fetched"))
}

/// # GET /api/customer/:id
pub async fn get_customer(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Reply<Customer> {
    let customer = state
        .customers
        .get_by_id(id)
        .await?
        .ok_or_else(|| DbError::NotFound("customer".to_string()))?;
    Ok(ApiResponse::ok(customer, "Customer fetched"))
}

/// # PUT /api/customer/:id
pub async fn update_customer(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UpdateCustomer>,
) -> Reply<Customer> {
    let customer = state.customers.update(id, &payload).await?;
    Ok(ApiResponse::ok(customer, "Customer updated"))
}

/// # DELETE /api/customer/:id
pub async fn delete_customer(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Reply<()> {
    state.customers.delete(id).await?;
    Ok(ApiResponse::ok((), "Customer deleted"))
}
