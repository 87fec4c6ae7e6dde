//! Wallet API handlers

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::state::AppState;
use super::types::{ApiError, ApiResponse, ApiResult, created, ok};
use crate::ledger::{TransactionHistoryEntry, TransferResult};
use crate::service::{HistoryPage, TransferRequest};
use crate::wallet::WalletBalance;

// --- Requests ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferApiRequest {
    /// Account id of the user
    pub user_id: String,
    /// Asset short code, e.g. "GOLD_COINS"
    #[schema(example = "GOLD_COINS")]
    pub asset_code: String,
    /// Amount in the asset's smallest unit, strictly positive
    pub amount: i64,
    /// Opaque retry-safety token, at most 255 bytes. Send a fresh UUID per
    /// mutating request.
    #[serde(default)]
    pub idempotency_key: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl From<TransferApiRequest> for TransferRequest {
    fn from(req: TransferApiRequest) -> Self {
        Self {
            user_id: req.user_id,
            asset_code: req.asset_code,
            amount: req.amount,
            idempotency_key: req.idempotency_key,
            description: req.description,
            metadata: req.metadata,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub asset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub asset: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// --- Handlers ---

/// Top up a user's wallet from Treasury
///
/// POST /api/v1/wallet/topup
#[utoipa::path(
    post,
    path = "/api/v1/wallet/topup",
    request_body = TransferApiRequest,
    responses(
        (status = 201, description = "Transfer committed", body = ApiResponse<TransferResult>),
        (status = 200, description = "Idempotent replay of a prior commit"),
        (status = 400, description = "Invalid parameters"),
        (status = 404, description = "Unknown user, wallet, or asset"),
        (status = 409, description = "Duplicate idempotency key or retryable conflict")
    ),
    tag = "Wallet"
)]
pub async fn top_up(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransferApiRequest>,
) -> ApiResult<TransferResult> {
    match state.service.top_up(req.into()).await {
        Ok(result) if result.idempotent => ok(result),
        Ok(result) => created(result),
        Err(e) => ApiError::from(e).into_err(),
    }
}

/// Issue a promotional bonus from Treasury
///
/// POST /api/v1/wallet/bonus
#[utoipa::path(
    post,
    path = "/api/v1/wallet/bonus",
    request_body = TransferApiRequest,
    responses(
        (status = 201, description = "Transfer committed", body = ApiResponse<TransferResult>),
        (status = 200, description = "Idempotent replay of a prior commit"),
        (status = 400, description = "Invalid parameters"),
        (status = 404, description = "Unknown user, wallet, or asset"),
        (status = 409, description = "Duplicate idempotency key or retryable conflict")
    ),
    tag = "Wallet"
)]
pub async fn issue_bonus(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransferApiRequest>,
) -> ApiResult<TransferResult> {
    match state.service.issue_bonus(req.into()).await {
        Ok(result) if result.idempotent => ok(result),
        Ok(result) => created(result),
        Err(e) => ApiError::from(e).into_err(),
    }
}

/// Spend from a user's wallet into Revenue
///
/// POST /api/v1/wallet/purchase
#[utoipa::path(
    post,
    path = "/api/v1/wallet/purchase",
    request_body = TransferApiRequest,
    responses(
        (status = 201, description = "Transfer committed", body = ApiResponse<TransferResult>),
        (status = 200, description = "Idempotent replay of a prior commit"),
        (status = 400, description = "Invalid parameters or insufficient balance"),
        (status = 404, description = "Unknown user, wallet, or asset"),
        (status = 409, description = "Duplicate idempotency key or retryable conflict")
    ),
    tag = "Wallet"
)]
pub async fn purchase(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransferApiRequest>,
) -> ApiResult<TransferResult> {
    match state.service.purchase(req.into()).await {
        Ok(result) if result.idempotent => ok(result),
        Ok(result) => created(result),
        Err(e) => ApiError::from(e).into_err(),
    }
}

/// Get a user's wallet balances
///
/// GET /api/v1/wallet/{user_id}/balance
#[utoipa::path(
    get,
    path = "/api/v1/wallet/{user_id}/balance",
    params(
        ("user_id" = String, Path, description = "Account id of the user"),
        ("asset" = Option<String>, Query, description = "Narrow to one asset code")
    ),
    responses(
        (status = 200, description = "Balances", body = ApiResponse<Vec<WalletBalance>>),
        (status = 400, description = "Invalid user id"),
        (status = 404, description = "User has no wallets")
    ),
    tag = "Wallet"
)]
pub async fn get_balance(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<BalanceQuery>,
) -> ApiResult<Vec<WalletBalance>> {
    match state
        .service
        .get_balance(&user_id, query.asset.as_deref())
        .await
    {
        Ok(balances) => ok(balances),
        Err(e) => ApiError::from(e).into_err(),
    }
}

/// Get a user's transaction history, newest first
///
/// GET /api/v1/wallet/{user_id}/transactions
#[utoipa::path(
    get,
    path = "/api/v1/wallet/{user_id}/transactions",
    params(
        ("user_id" = String, Path, description = "Account id of the user"),
        ("asset" = Option<String>, Query, description = "Narrow to one asset code"),
        ("limit" = Option<i64>, Query, description = "Page size, clamped to [1, 100], default 20"),
        ("offset" = Option<i64>, Query, description = "Rows to skip, default 0")
    ),
    responses(
        (status = 200, description = "History page", body = ApiResponse<Vec<TransactionHistoryEntry>>),
        (status = 400, description = "Invalid user id")
    ),
    tag = "Wallet"
)]
pub async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Vec<TransactionHistoryEntry>> {
    let page = HistoryPage {
        limit: query.limit,
        offset: query.offset,
    };
    match state
        .service
        .get_transactions(&user_id, query.asset.as_deref(), page)
        .await
    {
        Ok(entries) => ok(entries),
        Err(e) => ApiError::from(e).into_err(),
    }
}

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1703494800000_u64)]
    pub timestamp_ms: u64,
}

/// Health check endpoint
///
/// Runs a trivial query against the wallet store and reports readiness
/// only: the server clock on success, a bare 503 when the store is
/// unreachable. Storage errors are logged but never leak into the payload.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(HealthResponse {
                timestamp_ms: now_ms,
            })),
        ),
        Err(e) => {
            tracing::error!("[HEALTH] store ping failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    code: 503,
                    msg: "unavailable".to_string(),
                    data: None,
                    retryable: None,
                    details: None,
                }),
            )
        }
    }
}
