//! API routes

pub mod health;
pub mod task;

use axum::http::StatusCode;
use axum::Json;

pub use task::ErrorResponse;

/// Fallback for unmatched routes
pub async fn fallback() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "Route not found".to_string(),
            details: None,
        }),
    )
}
