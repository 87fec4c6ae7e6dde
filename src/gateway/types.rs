//! API response types and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `ApiResult<T>`: Type alias for handler return types
//! - `ApiError`: Unified error type with IntoResponse
//! - `error_codes`: Standard error code constants

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::WalletError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
/// - retryable: present and true for transient error kinds
/// - details: structured error context (e.g. insufficient-balance amounts)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "ok".to_string(),
            data: Some(data),
            retryable: None,
            details: None,
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
            retryable: None,
            details: None,
        }
    }
}

// ============================================================================
// ApiResult: DRY Type Alias for Handlers
// ============================================================================

/// Type alias for handler return types - reduces boilerplate
pub type ApiResult<T> =
    Result<(StatusCode, Json<ApiResponse<T>>), (StatusCode, Json<ApiResponse<()>>)>;

/// Helper to create success response (200 OK)
#[inline]
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

/// Helper to create created response (201 CREATED)
#[inline]
pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

// ============================================================================
// ApiError: Unified Error Type
// ============================================================================

/// Unified API error type with automatic IntoResponse
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub message: String,
    pub retryable: bool,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new ApiError
    pub fn new(status: StatusCode, code: i32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            retryable: false,
            details: None,
        }
    }

    /// 400 Bad Request with VALIDATION code
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::VALIDATION, msg)
    }

    /// 404 Not Found
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error_codes::NOT_FOUND, msg)
    }

    /// 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }

    /// 503 Service Unavailable
    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            error_codes::SERVICE_UNAVAILABLE,
            msg,
        )
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn body(&self) -> ApiResponse<()> {
        ApiResponse {
            code: self.code,
            msg: self.message.clone(),
            data: None,
            retryable: self.retryable.then_some(true),
            details: self.details.clone(),
        }
    }

    /// Convert to handler error tuple
    pub fn into_err<T>(self) -> ApiResult<T> {
        let body = self.body();
        Err((self.status, Json(body)))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(self.body());
        (self.status, body).into_response()
    }
}

/// Classify engine failures into the wire taxonomy.
///
/// Internal failures keep their raw message only in debug builds.
impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Validation(msg) => ApiError::bad_request(msg),
            WalletError::NotFound(msg) => ApiError::not_found(msg),
            WalletError::InsufficientBalance {
                wallet_id,
                requested,
                available,
            } => ApiError::new(
                StatusCode::BAD_REQUEST,
                error_codes::INSUFFICIENT_BALANCE,
                "Insufficient balance",
            )
            .with_details(serde_json::json!({
                "wallet_id": wallet_id,
                "requested": requested,
                "available": available,
            })),
            WalletError::DuplicateTransaction => ApiError::new(
                StatusCode::CONFLICT,
                error_codes::DUPLICATE_TRANSACTION,
                "Duplicate transaction for idempotency key",
            ),
            WalletError::ConstraintViolation(msg) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::CONSTRAINT_VIOLATION,
                format!("Storage constraint violated: {}", msg),
            ),
            WalletError::DeadlockDetected => ApiError::new(
                StatusCode::CONFLICT,
                error_codes::DEADLOCK_DETECTED,
                "Transaction aborted to break a deadlock, please retry",
            )
            .retryable(),
            WalletError::SerializationFailure => ApiError::new(
                StatusCode::CONFLICT,
                error_codes::SERIALIZATION_FAILURE,
                "Concurrent modification detected, please retry",
            )
            .retryable(),
            WalletError::ConnectionTimeout => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::CONNECTION_TIMEOUT,
                "Timed out acquiring a store connection",
            ),
            WalletError::StatementTimeout => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                error_codes::STATEMENT_TIMEOUT,
                "Statement cancelled by server timeout",
            ),
            WalletError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                if cfg!(debug_assertions) {
                    ApiError::internal(msg)
                } else {
                    ApiError::internal("Internal error")
                }
            }
        }
    }
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const VALIDATION: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const DUPLICATE_TRANSACTION: i32 = 1003;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4004;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const CONSTRAINT_VIOLATION: i32 = 5002;
    pub const DEADLOCK_DETECTED: i32 = 5003;
    pub const SERIALIZATION_FAILURE: i32 = 5004;
    pub const CONNECTION_TIMEOUT: i32 = 5005;
    pub const STATEMENT_TIMEOUT: i32 = 5006;
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_insufficient_balance_carries_context() {
        let err = ApiError::from(WalletError::InsufficientBalance {
            wallet_id: Uuid::from_u128(0x7),
            requested: 999_999,
            available: 25,
        });

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, error_codes::INSUFFICIENT_BALANCE);
        let details = err.details.expect("details");
        assert_eq!(details["requested"], 999_999);
        assert_eq!(details["available"], 25);
    }

    #[test]
    fn test_retryable_marker_on_deadlock() {
        let err = ApiError::from(WalletError::DeadlockDetected);
        assert!(err.retryable);
        assert_eq!(err.code, error_codes::DEADLOCK_DETECTED);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from(WalletError::validation("amount must be positive"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(!err.retryable);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::from(WalletError::not_found("no wallet"));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, error_codes::NOT_FOUND);
    }
}
