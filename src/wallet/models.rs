//! Wallet and account models

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Account kind discriminants as stored in `accounts.kind`
pub mod account_kind {
    pub const USER: i16 = 1;
    pub const SYSTEM: i16 = 2;
}

/// Treasury: the single source of newly issued value. May go negative.
pub const TREASURY_ACCOUNT_ID: Uuid = Uuid::from_u128(0x1);

/// Revenue: the sink of spent value. Configured with the same negative
/// allowance as Treasury.
pub const REVENUE_ACCOUNT_ID: Uuid = Uuid::from_u128(0x2);

/// A wallet row as read (and locked) from the store.
///
/// `balance` and `version` are mutated only by the ledger writer, under an
/// exclusive row lock held for the rest of the transaction.
#[derive(Debug, Clone, FromRow)]
pub struct Wallet {
    pub wallet_id: Uuid,
    pub account_id: Uuid,
    pub asset_type_id: i16,
    pub balance: i64,
    pub allow_negative: bool,
    pub version: i64,
}

/// Balance info for one wallet, joined with its asset type
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct WalletBalance {
    pub wallet_id: Uuid,
    /// Asset short code, e.g. "GOLD_COINS"
    #[schema(example = "GOLD_COINS")]
    pub asset_code: String,
    pub asset_name: String,
    /// Balance in the asset's smallest unit
    pub balance: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_account_ids_are_distinct() {
        assert_ne!(TREASURY_ACCOUNT_ID, REVENUE_ACCOUNT_ID);
        assert!(!TREASURY_ACCOUNT_ID.is_nil());
        assert!(!REVENUE_ACCOUNT_ID.is_nil());
    }
}
