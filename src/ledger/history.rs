//! Ledger-joined transaction history queries

use sqlx::PgExecutor;
use uuid::Uuid;

use super::models::TransactionHistoryEntry;
use crate::config::HistoryConfig;
use crate::error::WalletResult;

/// Clamp a requested history page into the configured bounds.
///
/// Out-of-range limits are clamped, not rejected; a negative offset is
/// treated as zero.
pub fn clamp_page(limit: Option<i64>, offset: Option<i64>, config: &HistoryConfig) -> (i64, i64) {
    let limit = limit
        .unwrap_or(config.history_default_limit)
        .clamp(1, config.history_max_limit);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

pub struct LedgerHistory;

impl LedgerHistory {
    /// Fetch an account's ledger-joined history, newest first.
    pub async fn for_account<'e, E>(
        executor: E,
        account_id: Uuid,
        asset_code: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> WalletResult<Vec<TransactionHistoryEntry>>
    where
        E: PgExecutor<'e>,
    {
        let entries: Vec<TransactionHistoryEntry> = sqlx::query_as(
            r#"
            SELECT t.transaction_id, t.kind, e.entry_type, e.wallet_id,
                   a.code AS asset_code, e.amount, e.balance_before,
                   e.balance_after, t.description, e.created_at
            FROM ledger_entries e
            JOIN transactions t ON e.transaction_id = t.transaction_id
            JOIN wallets w ON e.wallet_id = w.wallet_id
            JOIN asset_types a ON w.asset_type_id = a.asset_type_id
            WHERE w.account_id = $1
              AND ($2::varchar IS NULL OR a.code = $2)
            ORDER BY e.entry_id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(account_id)
        .bind(asset_code)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HistoryConfig {
        HistoryConfig {
            history_default_limit: 20,
            history_max_limit: 100,
        }
    }

    #[test]
    fn test_clamp_defaults() {
        assert_eq!(clamp_page(None, None, &config()), (20, 0));
    }

    #[test]
    fn test_clamp_limit_zero_raised_to_one() {
        assert_eq!(clamp_page(Some(0), None, &config()), (1, 0));
    }

    #[test]
    fn test_clamp_limit_above_max() {
        assert_eq!(clamp_page(Some(500), None, &config()), (100, 0));
    }

    #[test]
    fn test_clamp_limit_in_range_kept() {
        assert_eq!(clamp_page(Some(42), Some(10), &config()), (42, 10));
    }

    #[test]
    fn test_clamp_negative_offset() {
        assert_eq!(clamp_page(None, Some(-5), &config()), (20, 0));
    }
}
