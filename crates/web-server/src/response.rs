use axum::Json;
use serde::Serialize;

/// The envelope every endpoint answers with:
/// `{success, data, message}`. Errors produce the same shape with
/// `success: false` and `data: null` (see `error.rs`).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            message: message.into(),
        })
    }
}
