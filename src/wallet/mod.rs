//! Wallets: per-account, per-asset balance containers

pub mod locator;
pub mod locks;
pub mod models;

pub use locator::WalletLocator;
pub use locks::WalletLockManager;
pub use models::{REVENUE_ACCOUNT_ID, TREASURY_ACCOUNT_ID, Wallet, WalletBalance};
