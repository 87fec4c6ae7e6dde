//! OpenAPI documentation
//!
//! Auto-generated OpenAPI 3.0 description of the wallet API.
//! JSON served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::gateway::handlers::{HealthResponse, TransferApiRequest};
use crate::ledger::{TransactionHistoryEntry, TransferResult, WalletDelta};
use crate::wallet::WalletBalance;

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coinvault Wallet API",
        version = "1.0.0",
        description = "Transactional virtual-currency wallet service: multi-asset balances, \
                       double-entry ledger, and at-most-once transfers via idempotency keys.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::top_up,
        crate::gateway::handlers::issue_bonus,
        crate::gateway::handlers::purchase,
        crate::gateway::handlers::get_balance,
        crate::gateway::handlers::get_transactions,
    ),
    components(schemas(
        TransferApiRequest,
        TransferResult,
        WalletDelta,
        WalletBalance,
        TransactionHistoryEntry,
        HealthResponse,
    )),
    tags(
        (name = "Wallet", description = "Balance transfers and queries"),
        (name = "System", description = "Service health")
    )
)]
pub struct ApiDoc;
