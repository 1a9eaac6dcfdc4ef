//! The `socratic serve` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use socratic_providers::config::load_config_from;

pub async fn execute(bind: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    for problem in config.problems() {
        tracing::warn!("{problem}");
    }

    let app = socratic_server::build_app(&config)?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;

    tracing::info!(
        provider = ?config.provider,
        model = %config.relay.model,
        "listening on http://{}",
        config.server.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
