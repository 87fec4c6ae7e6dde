//! Ledger models: business transactions and their paired entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Business transaction kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    TopUp,
    Bonus,
    Purchase,
}

impl TransactionKind {
    pub fn id(self) -> i16 {
        match self {
            Self::TopUp => 1,
            Self::Bonus => 2,
            Self::Purchase => 3,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Self::TopUp),
            2 => Some(Self::Bonus),
            3 => Some(Self::Purchase),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopUp => "top_up",
            Self::Bonus => "bonus",
            Self::Purchase => "purchase",
        }
    }
}

impl TryFrom<i16> for TransactionKind {
    type Error = String;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or_else(|| format!("Invalid transaction kind: {}", id))
    }
}

/// Transaction lifecycle status. Successful transfers commit straight to
/// `Completed`; the other states exist for operational tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Reversed,
}

impl TransactionStatus {
    pub fn id(self) -> i16 {
        match self {
            Self::Pending => 1,
            Self::Completed => 2,
            Self::Failed => 3,
            Self::Reversed => 4,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Self::Pending),
            2 => Some(Self::Completed),
            3 => Some(Self::Failed),
            4 => Some(Self::Reversed),
            _ => None,
        }
    }
}

/// Ledger entry direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Debit,
    Credit,
}

impl EntryType {
    pub fn id(self) -> i16 {
        match self {
            Self::Debit => 1,
            Self::Credit => 2,
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(Self::Debit),
            2 => Some(Self::Credit),
            _ => None,
        }
    }
}

impl TryFrom<i16> for EntryType {
    type Error = String;

    fn try_from(id: i16) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or_else(|| format!("Invalid entry type: {}", id))
    }
}

/// One side of a completed transfer: the wallet and its balance movement
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletDelta {
    pub wallet_id: Uuid,
    pub balance_before: i64,
    pub balance_after: i64,
}

/// The composed result of a successful transfer
///
/// Serialized as-is into the idempotency cache; a replay deserializes it
/// back and flips `idempotent` on.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransferResult {
    pub transaction_id: Uuid,
    pub kind: TransactionKind,
    #[schema(example = "GOLD_COINS")]
    pub asset_code: String,
    /// Amount moved, in the asset's smallest unit
    pub amount: i64,
    pub source: WalletDelta,
    pub destination: WalletDelta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    /// True when this response was replayed from the idempotency cache
    #[serde(default)]
    pub idempotent: bool,
}

/// One row of ledger-joined transaction history
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct TransactionHistoryEntry {
    pub transaction_id: Uuid,
    #[sqlx(try_from = "i16")]
    pub kind: TransactionKind,
    #[sqlx(try_from = "i16")]
    pub entry_type: EntryType,
    pub wallet_id: Uuid,
    pub asset_code: String,
    pub amount: i64,
    pub balance_before: i64,
    pub balance_after: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_kind_id_round_trip() {
        for kind in [
            TransactionKind::TopUp,
            TransactionKind::Bonus,
            TransactionKind::Purchase,
        ] {
            assert_eq!(TransactionKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(TransactionKind::from_id(0), None);
        assert_eq!(TransactionKind::from_id(99), None);
    }

    #[test]
    fn test_transaction_status_id_round_trip() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
            TransactionStatus::Reversed,
        ] {
            assert_eq!(TransactionStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(TransactionStatus::from_id(0), None);
    }

    #[test]
    fn test_entry_type_id_round_trip() {
        assert_eq!(EntryType::from_id(EntryType::Debit.id()), Some(EntryType::Debit));
        assert_eq!(EntryType::from_id(EntryType::Credit.id()), Some(EntryType::Credit));
        assert_eq!(EntryType::from_id(3), None);
    }

    #[test]
    fn test_transfer_result_cache_round_trip() {
        let result = TransferResult {
            transaction_id: Uuid::from_u128(0x42),
            kind: TransactionKind::TopUp,
            asset_code: "GOLD_COINS".to_string(),
            amount: 500,
            source: WalletDelta {
                wallet_id: Uuid::from_u128(0x1),
                balance_before: -3750,
                balance_after: -4250,
            },
            destination: WalletDelta {
                wallet_id: Uuid::from_u128(0x2),
                balance_before: 1000,
                balance_after: 1500,
            },
            description: Some("buy".to_string()),
            created_at: Utc::now(),
            idempotent: false,
        };

        let cached = serde_json::to_value(&result).unwrap();
        let mut replayed: TransferResult = serde_json::from_value(cached).unwrap();
        replayed.idempotent = true;

        assert_eq!(replayed.transaction_id, result.transaction_id);
        assert_eq!(replayed.amount, result.amount);
        assert_eq!(replayed.source.balance_after, -4250);
        assert!(replayed.idempotent);
    }
}
