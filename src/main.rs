use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trackmix::{
    config::Config,
    routes::{create_router, AppState},
    services::providers::LastFmProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("trackmix=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let lastfm = Arc::new(
        LastFmProvider::new(
            config.lastfm_api_key.clone(),
            config.lastfm_api_url.clone(),
            config.lastfm_username.clone(),
            config.similar_limit,
            Duration::from_secs(config.lastfm_timeout_secs),
        )
        .context("Failed to build Last.fm client")?,
    );

    let state = Arc::new(AppState::new(
        lastfm.clone(),
        lastfm,
        AppState::defaults_from_config(&config),
    ));

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(address = %addr, user = %config.lastfm_username, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
