use axum::http::StatusCode;

pub mod articles;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
