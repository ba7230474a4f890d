use std::sync::Arc;

use anyhow::Context;

use stockledger_api::app::{build_app, services};
use stockledger_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    stockledger_observability::init();

    let config = ApiConfig::from_env()?;

    // Opening the store blocks (the SQLite store runs its own runtime).
    let (store, sku) = (config.store.clone(), config.sku.clone());
    let services = tokio::task::spawn_blocking(move || services::bootstrap(&store, &sku))
        .await
        .context("store bootstrap task failed")??;

    let app = build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
