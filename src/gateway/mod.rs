//! HTTP gateway
//!
//! Thin axum surface over the wallet service. Auth, rate limiting, and CORS
//! are handled by the platform edge in front of this service.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Json, Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::config::GatewayConfig;
use state::AppState;

/// Start the HTTP gateway server
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let openapi = openapi::ApiDoc::openapi();

    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/v1/wallet/topup", post(handlers::top_up))
        .route("/api/v1/wallet/bonus", post(handlers::issue_bonus))
        .route("/api/v1/wallet/purchase", post(handlers::purchase))
        .route(
            "/api/v1/wallet/{user_id}/balance",
            get(handlers::get_balance),
        )
        .route(
            "/api/v1/wallet/{user_id}/transactions",
            get(handlers::get_transactions),
        )
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Gateway listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
