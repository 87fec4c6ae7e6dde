//! Coinvault - Transactional Virtual-Currency Wallet Service
//!
//! Multi-asset balances for gaming and loyalty platforms, with strict
//! correctness guarantees: no lost updates, no negative user balances, no
//! duplicate processing of retried requests, and a double-entry audit trail.
//!
//! # Modules
//!
//! - [`config`] - Application configuration (store pool, limits, TTLs)
//! - [`db`] - PostgreSQL pool and schema bootstrap
//! - [`error`] - Wallet engine error taxonomy
//! - [`asset`] - Asset type catalog
//! - [`wallet`] - Wallet lookup and deterministic-order row locking
//! - [`idempotency`] - Cached responses for retried requests
//! - [`ledger`] - Double-entry writer and history queries
//! - [`service`] - Transfer orchestrator (the public operations)
//! - [`gateway`] - HTTP surface

pub mod config;
pub mod logging;

pub mod db;
pub mod error;

// Wallet engine
pub mod asset;
pub mod idempotency;
pub mod ledger;
pub mod service;
pub mod wallet;

// HTTP surface
pub mod gateway;

// Convenient re-exports at crate root
pub use config::AppConfig;
pub use db::Database;
pub use error::{WalletError, WalletResult};
pub use ledger::{TransactionKind, TransferResult};
pub use service::{TransferRequest, WalletService};
pub use wallet::{REVENUE_ACCOUNT_ID, TREASURY_ACCOUNT_ID};
