use crate::AppState;
use crate::handlers::Reply;
use crate::response::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use database::{CustomerPendingDetail, CustomerPendingSummary, DashboardStats};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPayload {
    pub year: i32,
    pub month: u32,
}

/// How many orders a bulk status flip touched.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedOrders {
    pub updated_orders: u64,
}

/// # GET /api/dashboard/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Reply<DashboardStats> {
    let stats = state.dashboard.get_stats(Utc::now()).await?;
    Ok(ApiResponse::ok(stats, "Stats fetched"))
}

/// # GET /api/dashboard/pending-payments
pub async fn list_pending_payments(
    State(state): State<Arc<AppState>>,
) -> Reply<Vec<CustomerPendingSummary>> {
    let summaries = state
        .dashboard
        .customers_with_pending_payments(Utc::now())
        .await?;
    Ok(ApiResponse::ok(summaries, "Pending payments fetched"))
}

/// # GET /api/dashboard/pending-payments/:customerId
pub async fn get_customer_pending_payments(
    Path(customer_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Reply<CustomerPendingDetail> {
    let detail = state
        .dashboard
        .customer_pending_payments(customer_id, Utc::now())
        .await?;
    Ok(ApiResponse::ok(detail, "Pending payments fetched"))
}

/// # PUT /api/dashboard/pending-payments/:customerId/paid
/// Marks every pending order of the customer as paid.
pub async fn mark_all_payments_paid(
    Path(customer_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Reply<UpdatedOrders> {
    let updated_orders = state
        .dashboard
        .mark_all_payments_paid(customer_id, Utc::now())
        .await?;
    Ok(ApiResponse::ok(
        UpdatedOrders { updated_orders },
        "Payments marked as paid",
    ))
}

/// # PUT /api/dashboard/pending-payments/:customerId/month/paid
pub async fn mark_month_paid(
    Path(customer_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MonthPayload>,
) -> Reply<UpdatedOrders> {
    let updated_orders = state
        .dashboard
        .mark_month_paid(customer_id, payload.year, payload.month)
        .await?;
    Ok(ApiResponse::ok(
        UpdatedOrders { updated_orders },
        "Month marked as paid",
    ))
}

/// # PUT /api/dashboard/pending-payments/:customerId/month/unpaid
pub async fn mark_month_unpaid(
    Path(customer_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MonthPayload>,
) -> Reply<UpdatedOrders> {
    let updated_orders = state
        .dashboard
        .mark_month_unpaid(customer_id, payload.year, payload.month)
        .await?;
    Ok(ApiResponse::ok(
        UpdatedOrders { updated_orders },
        "Month marked as unpaid",
    ))
}
