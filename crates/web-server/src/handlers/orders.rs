use crate::AppState;
use crate::handlers::Reply;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use core_types::{NewOrder, OrderUpdate, OrderWithItems, PaidFilter};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
    #[serde(default)]
    pub paid: PaidFilter,
}

/// # POST /api/order
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewOrder>,
) -> Reply<OrderWithItems> {
    let order = state.orders.create(&payload).await?;
    Ok(ApiResponse::ok(order, "Order created"))
}

/// # GET /api/order
/// Orders placed in the current calendar month.
pub async fn list_current_month_orders(
    State(state): State<Arc<AppState>>,
) -> Reply<Vec<OrderWithItems>> {
    let orders = state.orders.get_for_month(Utc::now()).await?;
    Ok(ApiResponse::ok(orders, "Orders fetched"))
}

/// # GET /api/order/:customerId?month&year&paid
/// One customer's orders, optionally narrowed to a month and payment filter.
pub async fn list_customer_orders(
    Path(customer_id): Path<Uuid>,
    Query(query): Query<OrderListQuery>,
    State(state): State<Arc<AppState>>,
) -> Reply<Vec<OrderWithItems>> {
    let orders = state
        .orders
        .get_for_customer(customer_id, query.month, query.year, query.paid, Utc::now())
        .await?;
    Ok(ApiResponse::ok(orders, "Orders fetched"))
}

/// # GET /api/admin/order
/// Full read of every order, for the admin screens.
pub async fn list_all_orders(State(state): State<Arc<AppState>>) -> Reply<Vec<OrderWithItems>> {
    let orders = state.orders.get_all().await?;
    Ok(ApiResponse::ok(orders, "Orders fetched"))
}

/// # PUT /api/order/:id
/// Partial update; a supplied item list replaces the order's item set and
/// recomputes the stored totals.
pub async fn update_order(
    Path(id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<OrderUpdate>,
) -> Reply<OrderWithItems> {
    let order = state.orders.update(id, &payload).await?;
    Ok(ApiResponse::ok(order, "Order updated"))
}

/// # DELETE /api/order/:id
pub async fn delete_order(Path(id): Path<Uuid>, State(state): State<Arc<AppState>>) -> Reply<()> {
    state.orders.delete(id).await?;
    Ok(ApiResponse::ok((), "Order deleted"))
}
