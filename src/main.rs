use anyhow::Context;
use clap::Parser;
use delivery_time_service::{config::ServerConfig, resources::AppContext, server};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();
    tracing::info!("config: {:?}", config);
    let ctx = Arc::new(AppContext::new(config));
    let addr = ctx.config().socket_addr();

    if !ctx.config().no_warmup {
        ctx.dataset().await.context("loading dataset")?;
        let mdl = ctx.model().await.context("loading model")?;
        // Forward pass on zeros to surface a broken estimator before serving
        let y = mdl.warmup().context("model warmup")?;
        tracing::info!("warmup forward ok ({:.3})", y);
    }

    let app = server::router(ctx);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
