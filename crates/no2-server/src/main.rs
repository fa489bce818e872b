use std::sync::Arc;

use anyhow::{Context, Result};
use no2_config::ServerConfig;
use no2_model::Forest;
use no2_server::{router, ServerState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env()?;

    // No model, no server.
    let model = Forest::load(&config.model_path)
        .with_context(|| format!("loading model from {}", config.model_path.display()))?;
    let state = Arc::new(ServerState::from_model(model)?);

    let app = router(state);

    let addr = config.bind_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
