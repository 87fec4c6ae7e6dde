//! Idempotency response cache
//!
//! Caches the serialized response of each keyed mutating request. The cache
//! is one half of the at-most-once protocol: it serves fast replays, while
//! the UNIQUE constraint on `transactions.idempotency_key` closes the
//! write-write race when two requests carry the same key concurrently.

use serde_json::Value as JsonValue;
use sqlx::{PgExecutor, PgPool, Row};

use crate::error::WalletResult;

/// A previously cached response for an idempotency key
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub response: JsonValue,
    pub status_code: i16,
}

pub struct IdempotencyStore;

impl IdempotencyStore {
    /// Fetch the cached response for `key`, if present and unexpired.
    ///
    /// Expired records are logically absent; the sweeper deletes them later.
    pub async fn lookup<'e, E>(executor: E, key: &str) -> WalletResult<Option<CachedResponse>>
    where
        E: PgExecutor<'e>,
    {
        let row = sqlx::query(
            r#"
            SELECT response, status_code
            FROM idempotency_records
            WHERE key = $1 AND expires_at > NOW()
            "#,
        )
        .bind(key)
        .fetch_optional(executor)
        .await?;

        Ok(row.map(|r| CachedResponse {
            response: r.get("response"),
            status_code: r.get("status_code"),
        }))
    }

    /// Record a response under `key`.
    ///
    /// A key collision is a silent no-op: the first committed writer wins
    /// and later writers must replay its cached response instead.
    pub async fn store<'e, E>(
        executor: E,
        key: &str,
        response: &JsonValue,
        status_code: i16,
        ttl_hours: i32,
    ) -> WalletResult<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO idempotency_records (key, response, status_code, created_at, expires_at)
            VALUES ($1, $2, $3, NOW(), NOW() + make_interval(hours => $4))
            ON CONFLICT (key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(response)
        .bind(status_code)
        .bind(ttl_hours)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Delete expired records. Run periodically from a background task.
    pub async fn purge_expired(pool: &PgPool) -> WalletResult<u64> {
        let result = sqlx::query("DELETE FROM idempotency_records WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
