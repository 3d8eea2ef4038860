use crate::AppState;
use crate::handlers::Reply;
use crate::response::ApiResponse;
use axum::{Json, extract::State};
use core_types::{AdminProfile, LoginRequest};
use std::sync::Arc;

/// # POST /api/admin/login
/// Returns the admin profile minus the password hash, or 401. The admin
/// customer/order sub-resources reuse the public handlers; only login is
/// admin-specific.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Reply<AdminProfile> {
    let profile = state
        .admins
        .verify_login(&payload.email, &payload.password)
        .await?;
    tracing::info!(email = %profile.email, "Admin logged in.");
    Ok(ApiResponse::ok(profile, "Login successful"))
}
