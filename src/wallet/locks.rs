//! Row-lock acquisition in a deterministic global order
//!
//! Every transfer locks its wallet set in ascending id order. The order is
//! total across all processes, so two transfers touching the same pair of
//! wallets can never hold one lock each while waiting for the other: the
//! circular-wait precondition for deadlock cannot form.

use std::collections::HashMap;

use sqlx::PgExecutor;
use uuid::Uuid;

use super::models::Wallet;
use crate::error::{WalletError, WalletResult};

pub struct WalletLockManager;

impl WalletLockManager {
    /// Deduplicate and sort wallet ids into the global lock order.
    ///
    /// Uuid ordering is plain byte order, identical everywhere.
    pub fn lock_order(wallet_ids: &[Uuid]) -> Vec<Uuid> {
        let mut ids = wallet_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Acquire exclusive row locks on the given wallets, returning their
    /// current state keyed by wallet id.
    ///
    /// Blocks until conflicting transactions commit or roll back. A row
    /// count short of the requested set means some wallet does not exist.
    pub async fn lock_wallets<'e, E>(
        executor: E,
        wallet_ids: &[Uuid],
    ) -> WalletResult<HashMap<Uuid, Wallet>>
    where
        E: PgExecutor<'e>,
    {
        let ids = Self::lock_order(wallet_ids);

        let rows: Vec<Wallet> = sqlx::query_as(
            r#"
            SELECT wallet_id, account_id, asset_type_id, balance, allow_negative, version
            FROM wallets
            WHERE wallet_id = ANY($1)
            ORDER BY wallet_id
            FOR UPDATE
            "#,
        )
        .bind(&ids)
        .fetch_all(executor)
        .await?;

        if rows.len() != ids.len() {
            return Err(WalletError::not_found(format!(
                "Expected {} wallets to lock, found {}",
                ids.len(),
                rows.len()
            )));
        }

        Ok(rows.into_iter().map(|w| (w.wallet_id, w)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_order_sorts_ascending() {
        let a = Uuid::from_u128(0xAA);
        let b = Uuid::from_u128(0x0B);
        let c = Uuid::from_u128(0xC0);

        let ordered = WalletLockManager::lock_order(&[c, a, b]);
        assert_eq!(ordered, vec![b, a, c]);
    }

    #[test]
    fn test_lock_order_dedups() {
        let a = Uuid::from_u128(0x1);
        let b = Uuid::from_u128(0x2);

        let ordered = WalletLockManager::lock_order(&[b, a, b, a, b]);
        assert_eq!(ordered, vec![a, b]);
    }

    #[test]
    fn test_lock_order_is_stable_across_permutations() {
        let ids: Vec<Uuid> = (1..=5u128).map(Uuid::from_u128).collect();
        let mut shuffled = ids.clone();
        shuffled.reverse();

        assert_eq!(
            WalletLockManager::lock_order(&ids),
            WalletLockManager::lock_order(&shuffled)
        );
    }

    #[test]
    fn test_lock_order_empty() {
        assert!(WalletLockManager::lock_order(&[]).is_empty());
    }
}
