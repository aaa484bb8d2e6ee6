use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bingenext_web::{
    api::{create_router, AppState},
    config::Config,
    services::HttpRecommendationProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bingenext_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider = HttpRecommendationProvider::new(config.recommender_url.clone());
    tracing::info!(recommender_url = %provider.api_url(), "Using recommendation service");

    // Initialize application state
    let state = AppState::new(Arc::new(provider)).with_upload_limit(config.max_upload_bytes);

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    tracing::info!("Server running on http://{}", config.bind_addr());
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
