//! Asset manager for loading and querying asset types

use super::models::AssetType;
use sqlx::PgExecutor;

/// Asset catalog queries
pub struct AssetManager;

impl AssetManager {
    /// Load all active asset types
    pub async fn load_active<'e, E>(executor: E) -> Result<Vec<AssetType>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let rows: Vec<AssetType> = sqlx::query_as(
            r#"SELECT asset_type_id, code, name, is_active
               FROM asset_types WHERE is_active"#,
        )
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    /// Get asset type by code (e.g., "GOLD_COINS")
    pub async fn get_by_code<'e, E>(
        executor: E,
        code: &str,
    ) -> Result<Option<AssetType>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<AssetType> = sqlx::query_as(
            r#"SELECT asset_type_id, code, name, is_active
               FROM asset_types WHERE code = $1"#,
        )
        .bind(code)
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }
}
