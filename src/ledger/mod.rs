//! Double-entry ledger: transaction records and paired debit/credit entries

pub mod history;
pub mod models;
pub mod writer;

pub use history::LedgerHistory;
pub use models::{
    EntryType, TransactionHistoryEntry, TransactionKind, TransactionStatus, TransferResult,
    WalletDelta,
};
pub use writer::{LedgerWriter, TransferSpec};
