use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meridian_client::HttpServiceClient;
use meridian_common::AppConfig;
use meridian_gateway::routes::{self, AppState};
use meridian_store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::gateway_from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let store = PgStore::connect(&config.database_url()).await?;
    store.migrate().await?;
    info!(region = %config.region, "Connected to database");

    // One shared HTTP client; per-call timeouts are injected at each call
    // site, the connect timeout is bounded here.
    let http_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .build()?;

    let validator = HttpServiceClient::new(http_client.clone(), &config.validator_url);
    let ingest = HttpServiceClient::new(http_client, &config.ingest_url);
    info!(
        validator = %config.validator_url,
        ingest = %config.ingest_url,
        "Backend services configured"
    );

    let addr = format!("{}:{}", config.host, config.port);
    let app = routes::build_router(Arc::new(AppState {
        store: Arc::new(store),
        validator: Arc::new(validator),
        ingest: Arc::new(ingest),
        config,
    }));

    info!("meridian-gateway listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
