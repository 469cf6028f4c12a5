use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use travel_planner::config::Config;
use travel_planner::handlers;
use travel_planner::service::TravelPlannerService;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();

    // Missing API key is fatal before any request is accepted
    let service = Arc::new(TravelPlannerService::from_config(&config)?);

    let bind: SocketAddr = config.server.bind.parse().with_context(|| {
        format!(
            "Invalid TP_HTTP_BIND '{}' (expected host:port)",
            config.server.bind
        )
    })?;
    let bearer_token = config.server.bearer_token.clone();

    let router = handlers::router(service, bearer_token.clone());

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        %bind,
        name = %config.server.name,
        version = %config.server.version,
        auth = %bearer_token.as_deref().map(|_| "bearer").unwrap_or("none"),
        "Starting travel planner HTTP server"
    );

    axum::serve(listener, router).await?;
    Ok(())
}
