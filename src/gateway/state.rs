use std::sync::Arc;

use crate::db::Database;
use crate::service::WalletService;

/// Gateway application state (shared)
pub struct AppState {
    /// PostgreSQL pool, used directly only by the health check
    pub db: Arc<Database>,
    /// Wallet engine entry points
    pub service: WalletService,
}

impl AppState {
    pub fn new(db: Arc<Database>, service: WalletService) -> Self {
        Self { db, service }
    }
}
