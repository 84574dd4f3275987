use anyhow::Context;
use tracing::info;

use crate::app::{app, AppState};
use crate::cli::open_store;
use crate::config::AppConfig;

pub async fn handle(config: AppConfig, memory: bool) -> anyhow::Result<()> {
    let store = open_store(&config, memory).await?;
    let router = app(AppState::new(store, &config), &config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!(
        "Module admin API listening on http://{}{}",
        bind_addr, config.server.base_path
    );

    axum::serve(listener, router).await.context("server")?;
    Ok(())
}
