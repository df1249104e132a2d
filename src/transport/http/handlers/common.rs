use crate::transport::http::types::NotFoundResponse;
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;

/// Fallback for unknown routes.
pub async fn not_found_handler(method: Method, uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            success: false,
            error: "Not Found".to_string(),
            message: format!("Cannot {} {}", method, uri.path()),
        }),
    )
}
