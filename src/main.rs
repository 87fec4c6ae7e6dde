use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use coinvault::config::AppConfig;
use coinvault::db::{Database, schema};
use coinvault::gateway::{self, state::AppState};
use coinvault::idempotency::IdempotencyStore;
use coinvault::logging::init_logging;
use coinvault::service::WalletService;

/// How often the background sweeper purges expired idempotency records
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("CV_ENV").unwrap_or_else(|_| "dev".to_string());
    let config = AppConfig::load(&env)?;
    let _guard = init_logging(&config);

    tracing::info!("coinvault starting (env: {})", env);

    let db = Arc::new(
        Database::connect(&config.store)
            .await
            .context("Failed to connect to store")?,
    );
    schema::ensure_schema(db.pool()).await?;

    let assets = coinvault::asset::AssetManager::load_active(db.pool())
        .await
        .context("Failed to load asset catalog")?;
    tracing::info!("Loaded {} active asset types", assets.len());

    spawn_idempotency_sweeper(db.clone());

    let service = WalletService::new(
        db.clone(),
        config.idempotency.clone(),
        config.transactions.clone(),
    );
    let state = Arc::new(AppState::new(db, service));

    gateway::run_server(&config.gateway, state).await
}

/// Expired idempotency records are logically absent the moment their TTL
/// passes; this task just reclaims the rows.
fn spawn_idempotency_sweeper(db: Arc<Database>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            ticker.tick().await;
            match IdempotencyStore::purge_expired(db.pool()).await {
                Ok(0) => {}
                Ok(purged) => {
                    tracing::info!(purged, "Expired idempotency records removed");
                }
                Err(e) => tracing::warn!("Idempotency purge failed: {}", e),
            }
        }
    });
}
