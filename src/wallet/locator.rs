//! Wallet lookup, joined with the asset catalog
//!
//! Reads only. The orchestrator resolves wallet ids here first, then hands
//! them to the lock manager; nothing in this module takes row locks.

use sqlx::PgExecutor;
use uuid::Uuid;

use super::models::{Wallet, WalletBalance};
use crate::error::{WalletError, WalletResult};

pub struct WalletLocator;

impl WalletLocator {
    /// Resolve `(account, asset code)` to its wallet.
    ///
    /// Fails with `NotFound` when the account has no wallet for that asset.
    pub async fn find_wallet<'e, E>(
        executor: E,
        account_id: Uuid,
        asset_code: &str,
    ) -> WalletResult<Wallet>
    where
        E: PgExecutor<'e>,
    {
        let wallet: Option<Wallet> = sqlx::query_as(
            r#"
            SELECT w.wallet_id, w.account_id, w.asset_type_id, w.balance,
                   w.allow_negative, w.version
            FROM wallets w
            JOIN asset_types a ON w.asset_type_id = a.asset_type_id
            WHERE w.account_id = $1 AND a.code = $2
            "#,
        )
        .bind(account_id)
        .bind(asset_code)
        .fetch_optional(executor)
        .await?;

        wallet.ok_or_else(|| {
            WalletError::not_found(format!(
                "No {} wallet for account {}",
                asset_code, account_id
            ))
        })
    }

    /// List an account's balances, optionally narrowed to one asset.
    pub async fn account_balances<'e, E>(
        executor: E,
        account_id: Uuid,
        asset_code: Option<&str>,
    ) -> WalletResult<Vec<WalletBalance>>
    where
        E: PgExecutor<'e>,
    {
        let balances: Vec<WalletBalance> = sqlx::query_as(
            r#"
            SELECT w.wallet_id, a.code AS asset_code, a.name AS asset_name, w.balance
            FROM wallets w
            JOIN asset_types a ON w.asset_type_id = a.asset_type_id
            WHERE w.account_id = $1
              AND ($2::varchar IS NULL OR a.code = $2)
            ORDER BY a.code
            "#,
        )
        .bind(account_id)
        .bind(asset_code)
        .fetch_all(executor)
        .await?;

        Ok(balances)
    }
}
