//! Asset type models

use sqlx::FromRow;

/// A kind of virtual currency (GOLD_COINS, DIAMONDS, LOYALTY_POINTS, ...)
///
/// Balances are kept in the asset's smallest unit as signed 64-bit integers;
/// the catalog row itself carries no scaling information.
#[derive(Debug, Clone, FromRow)]
pub struct AssetType {
    pub asset_type_id: i16,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_asset() {
        let asset = AssetType {
            asset_type_id: 1,
            code: "GOLD_COINS".to_string(),
            name: "Gold Coins".to_string(),
            is_active: true,
        };

        assert!(asset.is_active);
        assert_eq!(asset.code, "GOLD_COINS");
    }

    #[test]
    fn test_retired_asset() {
        let asset = AssetType {
            asset_type_id: 2,
            code: "LEGACY_TOKENS".to_string(),
            name: "Legacy Tokens".to_string(),
            is_active: false,
        };

        assert!(!asset.is_active);
    }
}
