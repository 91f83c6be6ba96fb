//! notetag server binary.

use std::sync::Arc;

use notetag::config::Config;
use notetag::server::{self, AppState};
use notetag::store::ShopifyStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let store = ShopifyStore::new(&config.shop_url, &config.access_token, &config.api_version)?;

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState {
        config,
        store: Arc::new(store),
    });
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    log::info!("notetag listening on {bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        log::warn!("failed to install ctrl-c handler; running without graceful shutdown");
        std::future::pending::<()>().await;
    }
    log::info!("shutdown signal received");
}
