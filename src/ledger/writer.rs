//! Ledger writer: the atomic double-entry mutation
//!
//! Runs entirely inside the caller's transaction, against wallet states the
//! lock manager already pinned with exclusive row locks. One call produces
//! two balance updates, one transaction row, and two ledger entries; any
//! failure rolls the whole set back with the enclosing transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::models::{
    EntryType, TransactionKind, TransactionStatus, TransferResult, WalletDelta,
};
use crate::error::{WalletError, WalletResult};
use crate::wallet::models::Wallet;

/// Everything the writer needs to move value between two locked wallets
#[derive(Debug)]
pub struct TransferSpec<'a> {
    pub source_wallet_id: Uuid,
    pub dest_wallet_id: Uuid,
    pub asset_type_id: i16,
    pub asset_code: &'a str,
    pub amount: i64,
    pub kind: TransactionKind,
    pub description: Option<&'a str>,
    pub metadata: JsonValue,
    pub idempotency_key: Option<&'a str>,
}

pub struct LedgerWriter;

impl LedgerWriter {
    /// Execute the double-entry write for one transfer.
    ///
    /// Preconditions: amount is positive, both wallets appear in `locked`
    /// (so their row locks are held by this transaction), and both carry
    /// the same asset type as the transfer.
    pub async fn execute_transfer(
        tx: &mut Transaction<'_, Postgres>,
        spec: &TransferSpec<'_>,
        locked: &HashMap<Uuid, Wallet>,
    ) -> WalletResult<TransferResult> {
        let source = locked.get(&spec.source_wallet_id).ok_or_else(|| {
            WalletError::Internal(format!(
                "source wallet {} missing from lock set",
                spec.source_wallet_id
            ))
        })?;
        let dest = locked.get(&spec.dest_wallet_id).ok_or_else(|| {
            WalletError::Internal(format!(
                "destination wallet {} missing from lock set",
                spec.dest_wallet_id
            ))
        })?;

        debug_assert!(spec.amount > 0);
        debug_assert_ne!(source.wallet_id, dest.wallet_id);
        debug_assert_eq!(source.asset_type_id, dest.asset_type_id);

        if !source.allow_negative && source.balance < spec.amount {
            return Err(WalletError::InsufficientBalance {
                wallet_id: source.wallet_id,
                requested: spec.amount,
                available: source.balance,
            });
        }

        let source_after = source.balance - spec.amount;
        let dest_after = dest.balance + spec.amount;

        // Source before destination, fixed for deterministic traces.
        Self::apply_balance(tx, source.wallet_id, source_after).await?;
        Self::apply_balance(tx, dest.wallet_id, dest_after).await?;

        let transaction_id = Uuid::new_v4();
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            r#"
            INSERT INTO transactions
                (transaction_id, idempotency_key, kind, status, source_wallet_id,
                 dest_wallet_id, asset_type_id, amount, description, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING created_at
            "#,
        )
        .bind(transaction_id)
        .bind(spec.idempotency_key)
        .bind(spec.kind.id())
        .bind(TransactionStatus::Completed.id())
        .bind(source.wallet_id)
        .bind(dest.wallet_id)
        .bind(spec.asset_type_id)
        .bind(spec.amount)
        .bind(spec.description)
        .bind(&spec.metadata)
        .fetch_one(&mut **tx)
        .await?;

        Self::append_entry(
            tx,
            transaction_id,
            source.wallet_id,
            EntryType::Debit,
            spec.amount,
            source.balance,
            source_after,
        )
        .await?;
        Self::append_entry(
            tx,
            transaction_id,
            dest.wallet_id,
            EntryType::Credit,
            spec.amount,
            dest.balance,
            dest_after,
        )
        .await?;

        tracing::debug!(
            transaction_id = %transaction_id,
            kind = spec.kind.as_str(),
            amount = spec.amount,
            source = %source.wallet_id,
            dest = %dest.wallet_id,
            "Ledger write complete"
        );

        Ok(TransferResult {
            transaction_id,
            kind: spec.kind,
            asset_code: spec.asset_code.to_string(),
            amount: spec.amount,
            source: WalletDelta {
                wallet_id: source.wallet_id,
                balance_before: source.balance,
                balance_after: source_after,
            },
            destination: WalletDelta {
                wallet_id: dest.wallet_id,
                balance_before: dest.balance,
                balance_after: dest_after,
            },
            description: spec.description.map(str::to_string),
            created_at,
            idempotent: false,
        })
    }

    async fn apply_balance(
        tx: &mut Transaction<'_, Postgres>,
        wallet_id: Uuid,
        balance: i64,
    ) -> WalletResult<()> {
        sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $1, version = version + 1, updated_at = NOW()
            WHERE wallet_id = $2
            "#,
        )
        .bind(balance)
        .bind(wallet_id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn append_entry(
        tx: &mut Transaction<'_, Postgres>,
        transaction_id: Uuid,
        wallet_id: Uuid,
        entry_type: EntryType,
        amount: i64,
        balance_before: i64,
        balance_after: i64,
    ) -> WalletResult<()> {
        sqlx::query(
            r#"
            INSERT INTO ledger_entries
                (transaction_id, wallet_id, entry_type, amount, balance_before, balance_after)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(transaction_id)
        .bind(wallet_id)
        .bind(entry_type.id())
        .bind(amount)
        .bind(balance_before)
        .bind(balance_after)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
