use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl AppError {
    /// Maps the error onto the status code and client-facing message.
    /// Anything unexpected becomes a 500 with a generic message; the detail
    /// is logged server-side and never leaks to the client.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Database(db_err) => match db_err {
                DbError::NotFound(_) => (StatusCode::NOT_FOUND, db_err.to_string()),
                DbError::Conflict(_) => (StatusCode::CONFLICT, db_err.to_string()),
                DbError::Validation(_) => (StatusCode::BAD_REQUEST, db_err.to_string()),
                DbError::InvalidCredentials => (StatusCode::UNAUTHORIZED, db_err.to_string()),
                _ => {
                    tracing::error!(error = ?db_err, "Database error.");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal database error occurred".to_string(),
                    )
                }
            },
        }
    }
}

/// Converts our custom `AppError` into an HTTP response carrying the
/// standard envelope.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let body = Json(json!({
            "success": false,
            "data": null,
            "message": message,
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_map_to_the_documented_status_codes() {
        let cases = [
            (DbError::NotFound("order".to_string()), StatusCode::NOT_FOUND),
            (
                DbError::Conflict("taken".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                DbError::Validation("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (DbError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                DbError::ConnectionConfig("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            let (status, _message) = AppError::Database(err).status_and_message();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn internal_errors_never_leak_details() {
        let (_, message) =
            AppError::Database(DbError::ConnectionConfig("secret detail".to_string()))
                .status_and_message();
        assert!(!message.contains("secret detail"));
    }
}
