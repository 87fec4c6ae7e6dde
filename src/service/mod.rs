//! Transfer orchestrator: the public wallet operations
//!
//! The service is the sole transaction owner. Each mutating operation runs
//! one store transaction that spans the idempotency lookup, wallet
//! resolution, lock acquisition, ledger write, and response caching, so a
//! failure at any step rolls back every side effect at once.

pub mod validation;

use std::sync::Arc;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::asset::AssetManager;
use crate::config::{HistoryConfig, IdempotencyConfig};
use crate::db::Database;
use crate::error::{WalletError, WalletResult};
use crate::idempotency::IdempotencyStore;
use crate::ledger::history::{self, LedgerHistory};
use crate::ledger::{
    LedgerWriter, TransactionHistoryEntry, TransactionKind, TransferResult, TransferSpec,
};
use crate::wallet::models::{REVENUE_ACCOUNT_ID, TREASURY_ACCOUNT_ID};
use crate::wallet::{WalletBalance, WalletLocator, WalletLockManager};

/// Status code recorded alongside cached responses
const CREATED_STATUS: i16 = 201;

/// Input to the mutating operations
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub user_id: String,
    pub asset_code: String,
    pub amount: i64,
    pub idempotency_key: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<JsonValue>,
}

/// Requested page of transaction history, before clamping
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryPage {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Clone)]
pub struct WalletService {
    db: Arc<Database>,
    idempotency: IdempotencyConfig,
    history: HistoryConfig,
}

impl WalletService {
    pub fn new(db: Arc<Database>, idempotency: IdempotencyConfig, history: HistoryConfig) -> Self {
        Self {
            db,
            idempotency,
            history,
        }
    }

    /// Credit a user's wallet from Treasury.
    pub async fn top_up(&self, req: TransferRequest) -> WalletResult<TransferResult> {
        self.transfer(TransactionKind::TopUp, req).await
    }

    /// Credit a user's wallet from Treasury as a promotional bonus.
    pub async fn issue_bonus(&self, req: TransferRequest) -> WalletResult<TransferResult> {
        self.transfer(TransactionKind::Bonus, req).await
    }

    /// Debit a user's wallet into Revenue.
    pub async fn purchase(&self, req: TransferRequest) -> WalletResult<TransferResult> {
        self.transfer(TransactionKind::Purchase, req).await
    }

    /// All the user's wallet balances, or one if `asset_code` is given.
    pub async fn get_balance(
        &self,
        user_id: &str,
        asset_code: Option<&str>,
    ) -> WalletResult<Vec<WalletBalance>> {
        let account_id = validation::parse_user_id(user_id)?;
        if let Some(code) = asset_code {
            validation::validate_asset_code(code)?;
        }

        let balances =
            WalletLocator::account_balances(self.db.pool(), account_id, asset_code).await?;

        if balances.is_empty() {
            return Err(WalletError::not_found(format!(
                "No wallets for user {}",
                user_id
            )));
        }
        Ok(balances)
    }

    /// Ledger-joined history for the user, newest first.
    pub async fn get_transactions(
        &self,
        user_id: &str,
        asset_code: Option<&str>,
        page: HistoryPage,
    ) -> WalletResult<Vec<TransactionHistoryEntry>> {
        let account_id = validation::parse_user_id(user_id)?;
        if let Some(code) = asset_code {
            validation::validate_asset_code(code)?;
        }
        let (limit, offset) = history::clamp_page(page.limit, page.offset, &self.history);

        LedgerHistory::for_account(self.db.pool(), account_id, asset_code, limit, offset).await
    }

    async fn transfer(
        &self,
        kind: TransactionKind,
        req: TransferRequest,
    ) -> WalletResult<TransferResult> {
        let account_id = validation::parse_user_id(&req.user_id)?;
        validation::validate_asset_code(&req.asset_code)?;
        validation::validate_amount(req.amount)?;
        validation::validate_idempotency_key(req.idempotency_key.as_deref())?;

        match self.try_transfer(kind, account_id, &req).await {
            Err(WalletError::DuplicateTransaction) if req.idempotency_key.is_some() => {
                // Two-phase recovery: the colliding writer has committed by
                // the time our insert failed, so its cached response must be
                // visible outside the aborted transaction.
                self.recover_duplicate(req.idempotency_key.as_deref().unwrap_or_default())
                    .await
            }
            other => other,
        }
    }

    async fn try_transfer(
        &self,
        kind: TransactionKind,
        account_id: Uuid,
        req: &TransferRequest,
    ) -> WalletResult<TransferResult> {
        let mut tx = self.db.pool().begin().await?;

        if let Some(key) = req.idempotency_key.as_deref()
            && let Some(cached) = IdempotencyStore::lookup(&mut *tx, key).await?
        {
            let mut result: TransferResult = serde_json::from_value(cached.response)
                .map_err(|e| WalletError::Internal(format!("corrupt cached response: {}", e)))?;
            result.idempotent = true;
            tracing::info!(
                key,
                transaction_id = %result.transaction_id,
                "Idempotent replay from cache"
            );
            return Ok(result);
        }

        let asset = AssetManager::get_by_code(&mut *tx, &req.asset_code)
            .await?
            .ok_or_else(|| {
                WalletError::not_found(format!("Unknown asset: {}", req.asset_code))
            })?;
        if !asset.is_active {
            return Err(WalletError::validation(format!(
                "Asset {} is not active",
                asset.code
            )));
        }

        let user_wallet =
            WalletLocator::find_wallet(&mut *tx, account_id, &req.asset_code).await?;
        let system_account = match kind {
            TransactionKind::TopUp | TransactionKind::Bonus => TREASURY_ACCOUNT_ID,
            TransactionKind::Purchase => REVENUE_ACCOUNT_ID,
        };
        let system_wallet =
            WalletLocator::find_wallet(&mut *tx, system_account, &req.asset_code).await?;

        let (source_id, dest_id) = match kind {
            TransactionKind::TopUp | TransactionKind::Bonus => {
                (system_wallet.wallet_id, user_wallet.wallet_id)
            }
            TransactionKind::Purchase => (user_wallet.wallet_id, system_wallet.wallet_id),
        };

        let locked = WalletLockManager::lock_wallets(&mut *tx, &[source_id, dest_id]).await?;

        let spec = TransferSpec {
            source_wallet_id: source_id,
            dest_wallet_id: dest_id,
            asset_type_id: asset.asset_type_id,
            asset_code: &asset.code,
            amount: req.amount,
            kind,
            description: req.description.as_deref(),
            metadata: req
                .metadata
                .clone()
                .unwrap_or_else(|| JsonValue::Object(Default::default())),
            idempotency_key: req.idempotency_key.as_deref(),
        };
        let result = LedgerWriter::execute_transfer(&mut tx, &spec, &locked).await?;

        if let Some(key) = req.idempotency_key.as_deref() {
            let payload = serde_json::to_value(&result)
                .map_err(|e| WalletError::Internal(format!("response serialization: {}", e)))?;
            IdempotencyStore::store(
                &mut *tx,
                key,
                &payload,
                CREATED_STATUS,
                self.idempotency.ttl_hours as i32,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            transaction_id = %result.transaction_id,
            kind = kind.as_str(),
            amount = req.amount,
            asset = %asset.code,
            user = %account_id,
            "Transfer committed"
        );

        Ok(result)
    }

    /// Second phase of the duplicate-key recovery: outside the aborted
    /// transaction, the winner's cache record is committed and readable.
    async fn recover_duplicate(&self, key: &str) -> WalletResult<TransferResult> {
        match IdempotencyStore::lookup(self.db.pool(), key).await? {
            Some(cached) => {
                let mut result: TransferResult = serde_json::from_value(cached.response)
                    .map_err(|e| {
                        WalletError::Internal(format!("corrupt cached response: {}", e))
                    })?;
                result.idempotent = true;
                tracing::info!(
                    key,
                    transaction_id = %result.transaction_id,
                    "Duplicate key recovered from cache"
                );
                Ok(result)
            }
            None => Err(WalletError::DuplicateTransaction),
        }
    }
}
