//! Weather Chat - HTTP Server Entry Point
//!
//! Starts the HTTP server that exposes the chat UI and agent API.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_chat::{api, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the variables may come from the real environment.
    let dotenv = dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_chat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={} temperature={}",
        config.model, config.temperature
    );

    // Start HTTP server
    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting server on http://{}", addr);

    api::serve(config).await?;

    Ok(())
}
