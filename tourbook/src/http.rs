pub mod middleware;
mod payload;

pub use payload::*;

use crate::config::ServerConfig;

pub async fn run(router: axum::Router, config: &ServerConfig) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!(
        "{}:{}",
        config.host.as_str(),
        config.port
    ))
    .await
    .map_err(|e| anyhow::anyhow!("tcp bind failed: {:?}", e))?;
    tracing::info!(host = %config.host, port = config.port, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("http serve failed: {:?}", e))?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
