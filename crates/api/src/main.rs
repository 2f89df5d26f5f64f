use std::sync::Arc;

use anyhow::Context;
use cinedex_infra::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cinedex_observability::init();

    let settings = Settings::from_env().context("invalid configuration")?;

    let gateway = cinedex_api::app::services::build_gateway(&settings)
        .await
        .context("failed to connect to the database")?;

    let app = cinedex_api::app::build_app(Arc::new(gateway.clone()));

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    gateway.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
