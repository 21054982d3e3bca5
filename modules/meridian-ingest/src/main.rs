use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meridian_common::AppConfig;
use meridian_ingest::routes::{self, AppState};
use meridian_store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::ingest_from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let store = PgStore::connect(&config.database_url()).await?;
    store.migrate().await?;
    info!(region = %config.region, "Connected to database");

    let addr = format!("{}:{}", config.host, config.port);
    let app = routes::build_router(Arc::new(AppState {
        store: Arc::new(store),
        config,
    }));

    info!("meridian-ingest listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
