use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::wallet::models::{REVENUE_ACCOUNT_ID, TREASURY_ACCOUNT_ID, account_kind};

/// Initialize the wallet schema
///
/// The balance-floor CHECK on wallets and the UNIQUE constraint on
/// `transactions.idempotency_key` are load-bearing: the engine relies on
/// them as the storage-side half of the correctness argument.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    tracing::info!("Initializing wallet schema...");

    sqlx::query(CREATE_ASSET_TYPES_TABLE)
        .execute(pool)
        .await
        .context("Failed to create asset_types table")?;

    sqlx::query(CREATE_ACCOUNTS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create accounts table")?;

    sqlx::query(CREATE_WALLETS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create wallets table")?;

    sqlx::query(CREATE_TRANSACTIONS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create transactions table")?;

    sqlx::query(CREATE_LEDGER_ENTRIES_TABLE)
        .execute(pool)
        .await
        .context("Failed to create ledger_entries table")?;

    sqlx::query(CREATE_LEDGER_ENTRIES_WALLET_INDEX)
        .execute(pool)
        .await
        .context("Failed to create ledger_entries wallet index")?;

    sqlx::query(CREATE_IDEMPOTENCY_RECORDS_TABLE)
        .execute(pool)
        .await
        .context("Failed to create idempotency_records table")?;

    seed_system_accounts(pool).await?;

    tracing::info!("Wallet schema initialized successfully");
    Ok(())
}

/// Insert the two well-known system accounts if absent.
///
/// Treasury is the source of newly issued value, Revenue the sink of spent
/// value; both may hold negative balances.
async fn seed_system_accounts(pool: &PgPool) -> Result<()> {
    for account_id in [TREASURY_ACCOUNT_ID, REVENUE_ACCOUNT_ID] {
        sqlx::query(
            r#"
            INSERT INTO accounts (account_id, kind, is_active)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (account_id) DO NOTHING
            "#,
        )
        .bind(account_id)
        .bind(account_kind::SYSTEM)
        .execute(pool)
        .await
        .context("Failed to seed system accounts")?;
    }
    Ok(())
}

const CREATE_ASSET_TYPES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS asset_types (
    asset_type_id SMALLSERIAL PRIMARY KEY,
    code          VARCHAR(32) NOT NULL UNIQUE,
    name          TEXT NOT NULL,
    is_active     BOOLEAN NOT NULL DEFAULT TRUE
)
"#;

const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    account_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    kind       SMALLINT NOT NULL,
    is_active  BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_WALLETS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS wallets (
    wallet_id      UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_id     UUID NOT NULL REFERENCES accounts(account_id),
    asset_type_id  SMALLINT NOT NULL REFERENCES asset_types(asset_type_id),
    balance        BIGINT NOT NULL DEFAULT 0,
    allow_negative BOOLEAN NOT NULL DEFAULT FALSE,
    version        BIGINT NOT NULL DEFAULT 0,
    updated_at     TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (account_id, asset_type_id),
    CONSTRAINT wallets_balance_floor CHECK (allow_negative OR balance >= 0)
)
"#;

const CREATE_TRANSACTIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    transaction_id   UUID PRIMARY KEY,
    idempotency_key  VARCHAR(255) UNIQUE,
    kind             SMALLINT NOT NULL,
    status           SMALLINT NOT NULL,
    source_wallet_id UUID NOT NULL REFERENCES wallets(wallet_id),
    dest_wallet_id   UUID NOT NULL REFERENCES wallets(wallet_id),
    asset_type_id    SMALLINT NOT NULL REFERENCES asset_types(asset_type_id),
    amount           BIGINT NOT NULL CHECK (amount > 0),
    description      TEXT,
    metadata         JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_LEDGER_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ledger_entries (
    entry_id       BIGSERIAL PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES transactions(transaction_id),
    wallet_id      UUID NOT NULL REFERENCES wallets(wallet_id),
    entry_type     SMALLINT NOT NULL,
    amount         BIGINT NOT NULL CHECK (amount > 0),
    balance_before BIGINT NOT NULL,
    balance_after  BIGINT NOT NULL,
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_LEDGER_ENTRIES_WALLET_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS ledger_entries_wallet_idx
    ON ledger_entries (wallet_id, entry_id DESC)
"#;

const CREATE_IDEMPOTENCY_RECORDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS idempotency_records (
    key         VARCHAR(255) PRIMARY KEY,
    response    JSONB NOT NULL,
    status_code SMALLINT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    expires_at  TIMESTAMPTZ NOT NULL
)
"#;
