// =========================
// tests/unit/error_tests.rs
// =========================
//! Unit tests for the error module
use axum::http::StatusCode;
use axum::response::IntoResponse;
use backend_lib::error::AppError;
use backend_lib::storage::StoreError;

#[test]
fn test_app_error_status_codes() {
    assert_eq!(
        AppError::PasswordHash("bad params".to_string()).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::Internal("test".to_string()).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(AppError::Store(StoreError::UsernameTaken).error_code(), "STORE_001");
    assert_eq!(AppError::PasswordHash("x".to_string()).error_code(), "AUTH_002");
    assert_eq!(AppError::Internal("x".to_string()).error_code(), "INT_001");
}

#[test]
fn test_app_error_sanitized_message() {
    let internal_error =
        AppError::Internal("Database connection failed at /var/lib/blog.db".to_string());
    assert_eq!(
        internal_error.sanitized_message(),
        "An internal server error occurred"
    );
}

#[tokio::test]
async fn test_error_response_body() {
    let response = AppError::Internal("boom".to_string()).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["error"]["code"], "INT_001");
    assert!(json["error"]["message"].is_string());
}
