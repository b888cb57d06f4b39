//! Router assembly and server startup.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::agent::Agent;
use crate::config::Config;

use super::{chat, types::HealthResponse, ui};

/// Shared application state.
pub struct AppState {
    pub agent: Agent,
}

/// Build the application router around an existing agent.
pub fn router(agent: Agent) -> Router {
    let state = Arc::new(AppState { agent });

    Router::new()
        .route("/", get(ui::index))
        .route("/api/health", get(health))
        .route("/api/chat", post(chat::send_message))
        .route("/api/sessions", get(chat::list_sessions))
        .route("/api/sessions/:id", delete(chat::clear_session))
        .route("/api/sessions/:id/history", get(chat::session_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and block until it stops.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = router(Agent::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Chat UI available at http://{}/", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.agent.config().model.clone(),
    })
}
